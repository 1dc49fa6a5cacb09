//! Tests for compact source generation

mod source_test;
use source_test::SourceTest;

#[test]
fn test_whitespace_is_minimal() {
    let test = SourceTest::new(
        r#"
        uniform mat4 modelViewProjection;
        attribute vec3 position;
        void main() {
            gl_Position = modelViewProjection * vec4(position, 1.0);
        }
    "#,
    )
    .unwrap();
    test.assert_renders(
        "uniform mat4 modelViewProjection;attribute vec3 position;void main(){gl_Position=modelViewProjection*vec4(position,1.0);}",
    );
    test.assert_round_trip();
}

#[test]
fn test_redundant_parentheses_are_dropped() {
    let test = SourceTest::new("float f(float a, float b) { return ((a) + (b * 2.0)) - (a - b); }")
        .unwrap();
    test.assert_renders("float f(float a,float b){return a+b*2.0-(a-b);}");
    test.assert_round_trip();
}

#[test]
fn test_required_parentheses_are_kept() {
    let test = SourceTest::new("void f() { x = (a + b) * -(c - d); y = !(a && b) || c; }").unwrap();
    test.assert_renders("void f(){x=(a+b)*-(c-d);y=!(a&&b)||c;}");
    test.assert_round_trip();
}

#[test]
fn test_control_flow() {
    let test = SourceTest::new(
        r#"
        int count(int n) {
            int total = 0;
            for (int i = 0; i < n; ++i) {
                if (i == 3) continue; else total += i;
            }
            while (total > 10) total--;
            do { total++; } while (total < 2);
            return total;
        }
    "#,
    )
    .unwrap();
    test.assert_renders(
        "int count(int n){int total=0;for(int i=0;i<n;++i){if(i==3)continue;else total+=i;}while(total>10)total--;do{total++;}while(total<2);return total;}",
    );
    test.assert_round_trip();
}

#[test]
fn test_structs_and_arrays() {
    let test = SourceTest::new(
        r#"
        struct Light { vec3 color; float power; };
        uniform Light lights[4];
        vec3 shade(int i) { return lights[i].color * lights[i].power; }
    "#,
    )
    .unwrap();
    test.assert_renders(
        "struct Light{vec3 color;float power;};uniform Light lights[4];vec3 shade(int i){return lights[i].color*lights[i].power;}",
    );
    test.assert_round_trip();
}

#[test]
fn test_preprocessor_lines_survive() {
    let test = SourceTest::new(
        "#version 100\n#define SCALE 2.0\nprecision mediump float;\nfloat k = SCALE;\n",
    )
    .unwrap();
    test.assert_renders("#version 100\n#define SCALE 2.0\nprecision mediump float;float k=SCALE;");
    test.assert_round_trip();
}

#[test]
fn test_display_separates_declarations() {
    let test = SourceTest::new("float a; float b;").unwrap();
    assert_eq!(format!("{}", test.tree()), "float a;\nfloat b;\n");
}
