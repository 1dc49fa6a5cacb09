//! Tests running the smc binary

use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

const VERTEX: &str = "attribute vec3 position;\nfloat unused() { return 1.0; }\nvoid main() {\n    vec4 p = vec4(position, 1.0);\n    gl_Position = p;\n}\n";
const FRAGMENT: &str = "precision mediump float;\nvoid main() {\n    gl_FragColor = vec4(1.0);\n}\n";

/// Write `contents` to a fresh file in the temp directory.
fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("smc-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn smc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smc"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_two_files() {
    let vertex = temp_file("two.vert", VERTEX);
    let fragment = temp_file("two.frag", FRAGMENT);
    let output = smc(&[vertex.to_str().unwrap(), fragment.to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "//! VERTEX\nattribute vec3 position;void main(){vec4 a=vec4(position,1.0);gl_Position=a;}\n//! FRAGMENT\nprecision mediump float;void main(){gl_FragColor=vec4(1.0);}\n"
    );
}

#[test]
fn test_combined_document_with_flags() {
    let document = format!("//! VERTEX\n{}//! FRAGMENT\n{}", VERTEX, FRAGMENT);
    let path = temp_file("combined.glsl", &document);
    let output = smc(&["--combined", path.to_str().unwrap(), "--keep-dead-code", "--no-minify", "--pretty"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("//! VERTEX\n"));
    assert!(text.contains("//! FRAGMENT\n"));
    assert!(text.contains("float unused(){return 1.0;}\n"));
    assert!(text.contains("vec4 p=vec4(position,1.0);"));
}

#[test]
fn test_parse_error_reports_location() {
    let vertex = temp_file("broken.vert", "void main() {\n    gl_Position = ;\n}\n");
    let fragment = temp_file("ok.frag", FRAGMENT);
    let output = smc(&[vertex.to_str().unwrap(), fragment.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.starts_with(&format!("{}:2:19: unexpected ';'", vertex.display())),
        "unexpected diagnostic: {}",
        stderr
    );
}

#[test]
fn test_combined_parse_error_line_is_file_relative() {
    let document = format!("//! VERTEX\n{}//! FRAGMENT\nvoid main() {{\n", VERTEX);
    let path = temp_file("broken.glsl", &document);
    let output = smc(&["--combined", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.starts_with(&format!("{}:10:1: unexpected end of input", path.display())),
        "unexpected diagnostic: {}",
        stderr
    );
}
