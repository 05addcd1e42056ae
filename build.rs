use std::path::Path;

fn main() {
    let rules_path = Path::new("config/attribute_counts.txt");
    validate_rules_file(rules_path);
    set_build_dependencies();
}

fn validate_rules_file(rules_path: &Path) {
    // Ensure the rule table exists at build time
    assert!(
        rules_path.exists(),
        "\n\nRULES BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the attribute count table before building.\n",
        rules_path.display()
    );

    let contents = std::fs::read_to_string(rules_path).unwrap_or_else(|e| {
        panic!(
            "\n\nRULES BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            rules_path.display()
        );
    });

    let mut total_rules = 0;
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        validate_rule_line(line, i + 1);
        total_rules += 1;
    }

    assert!(
        total_rules > 0,
        "\n\nRULES BUILD ERROR: No rules found in {}\n",
        rules_path.display()
    );

    println!("cargo:warning=Validated attribute count table: {total_rules} rules");
}

fn validate_rule_line(line: &str, line_num: usize) {
    let fields: Vec<&str> = line.split_whitespace().collect();

    let count = match fields.as_slice() {
        [_, count] => *count,
        [_, operator, count] => {
            assert!(
                matches!(*operator, "=" | "==" | "<" | ">"),
                "\n\nRULES BUILD ERROR: Line {line_num} has unknown operator '{operator}'\n\
                 Supported operators: =, <, >\n"
            );
            *count
        }
        _ => panic!(
            "\n\nRULES BUILD ERROR: Line {line_num} must have 2 or 3 fields\n\
             Got: {line}\n"
        ),
    };

    assert!(
        count.parse::<usize>().is_ok(),
        "\n\nRULES BUILD ERROR: Line {line_num} has invalid count '{count}'\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the rule table changes
    println!("cargo:rerun-if-changed=config/attribute_counts.txt");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
