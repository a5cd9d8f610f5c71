use std::fs;
use std::path::PathBuf;

use manpage_schema_core::{
    DESCRIPTION_LIMIT, ParamType, ToolSchema, ValueType, validate_tool,
};
use manpage_schema_discovery::config::{Dialect, EngineConfig};
use manpage_schema_discovery::parser::ManPageParser;
use manpage_schema_discovery::{parse_man_page, parse_man_page_with};

const FIXTURES: &[(&str, &str)] = &[
    ("grep", "bsd-grep.txt"),
    ("grep", "gnu-grep.txt"),
    ("curl", "curl.txt"),
    ("ls", "ls.txt"),
    ("true", "true.txt"),
];

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

fn names(tool: &ToolSchema) -> Vec<&str> {
    tool.parameters
        .iter()
        .map(|param| param.name.as_str())
        .collect()
}

fn assert_param(tool: &ToolSchema, name: &str, param_type: ParamType, value_type: Option<ValueType>) {
    let param = tool
        .find_parameter(name)
        .unwrap_or_else(|| panic!("missing parameter {name}; have {:?}", names(tool)));
    assert_eq!(param.param_type, param_type, "shape of {name}");
    assert_eq!(param.value_type, value_type, "value type of {name}");
}

#[test]
fn test_parse_bsd_grep_fixture_with_overstrike() {
    let tool = parse_man_page("grep", &fixture("bsd-grep.txt"));

    let description = tool.description.as_deref().unwrap();
    assert!(
        description.starts_with(
            "The grep utility searches any given input files, selecting lines that match one or more patterns."
        ),
        "{description}"
    );

    assert_eq!(
        names(&tool),
        vec![
            "pattern",
            "file",
            "-A",
            "-a",
            "-C",
            "--colour=[when]",
            "-e",
            "-f",
            "-i",
            "-m",
            "--null",
            "-o",
        ]
    );

    assert_param(&tool, "pattern", ParamType::Positional, None);
    assert_param(&tool, "-A", ParamType::Option, Some(ValueType::Number));
    assert_param(&tool, "-a", ParamType::Flag, None);
    assert_param(&tool, "--colour=[when]", ParamType::OptionEquals, Some(ValueType::String));
    assert_param(
        &tool,
        "-e",
        ParamType::Option,
        Some(ValueType::Custom("pattern".to_string())),
    );
    assert_param(&tool, "-f", ParamType::Option, Some(ValueType::FilePath));
    assert_param(&tool, "-m", ParamType::Option, Some(ValueType::Number));

    let null = tool.find_parameter("--null").unwrap();
    assert_eq!(
        null.description.as_deref(),
        Some("Prints a zero-byte after the file name.")
    );
    let after = tool.find_parameter("-A").unwrap();
    assert_eq!(
        after.description.as_deref(),
        Some("Print num lines of trailing context after each match. See also the -B and -C options.")
    );
}

#[test]
fn test_parse_gnu_grep_fixture_with_subsections() {
    let raw = fixture("gnu-grep.txt");
    let extraction = ManPageParser::default().parse(&raw);
    assert_eq!(extraction.options_heading.as_deref(), Some("OPTIONS"));
    assert_eq!(extraction.positional_count, 2);
    assert_eq!(extraction.entry_count, 14);

    let tool = extraction.into_tool("grep");
    let description = tool.description.as_deref().unwrap();
    assert!(description.starts_with("grep searches for PATTERNS in each FILE. PATTERNS is one"));
    assert!(description.chars().count() <= DESCRIPTION_LIMIT);

    let positional = tool.positional().collect::<Vec<_>>();
    assert_eq!(positional[0].name, "PATTERNS");
    assert_eq!(positional[0].position, Some(1));
    assert_eq!(positional[1].name, "FILE");
    assert_eq!(positional[1].position, Some(2));

    assert_param(&tool, "--help", ParamType::Flag, None);
    assert_param(&tool, "-V", ParamType::Flag, None);
    assert_param(
        &tool,
        "-e",
        ParamType::Option,
        Some(ValueType::Custom("patterns".to_string())),
    );
    assert_param(&tool, "-f", ParamType::Option, Some(ValueType::FilePath));
    assert_param(&tool, "--color[=WHEN]", ParamType::OptionEquals, Some(ValueType::String));
    assert_param(&tool, "-m", ParamType::Option, Some(ValueType::Number));
    assert_param(&tool, "-C", ParamType::Option, Some(ValueType::Number));
    assert_param(&tool, "--line-buffered", ParamType::Flag, None);

    // Subsection titles are indented less than entries and stay out of prose.
    let version = tool.find_parameter("-V").unwrap();
    assert_eq!(
        version.description.as_deref(),
        Some("Output the version number of grep and exit.")
    );
    let help = tool.find_parameter("--help").unwrap();
    assert_eq!(help.description.as_deref(), Some("Output a usage message and exit."));
}

#[test]
fn test_parse_curl_fixture_angle_placeholders() {
    let tool = parse_man_page("curl", &fixture("curl.txt"));

    assert_eq!(
        names(&tool),
        vec![
            "URLs",
            "--cookie",
            "--cookie-jar",
            "--connect-timeout",
            "--data",
            "--header",
            "--output",
            "--user",
            "-v",
        ]
    );
    assert_param(&tool, "--cookie", ParamType::Option, Some(ValueType::String));
    assert_param(&tool, "--cookie-jar", ParamType::Option, Some(ValueType::FilePath));
    assert_param(&tool, "--connect-timeout", ParamType::Option, Some(ValueType::Number));
    assert_param(&tool, "--output", ParamType::Option, Some(ValueType::FilePath));
    assert_param(&tool, "--user", ParamType::OptionKvColon, Some(ValueType::String));
    assert_param(&tool, "-v", ParamType::Flag, None);
}

#[test]
fn test_parse_ls_fixture_phrase_heading_inside_description() {
    let raw = fixture("ls.txt");
    let extraction = ManPageParser::default().parse(&raw);
    assert_eq!(
        extraction.options_heading.as_deref(),
        Some("Mandatory arguments to long options are mandatory for short options too")
    );

    let tool = extraction.into_tool("ls");
    assert_eq!(
        tool.description.as_deref(),
        Some(
            "List information about the FILEs (the current directory by default). Sort entries alphabetically if none of -cftuvSUX nor --sort is specified."
        )
    );
    assert_eq!(
        names(&tool),
        vec![
            "FILE",
            "-a",
            "--block-size=SIZE",
            "--color[=WHEN]",
            "--ignore=PATTERN",
            "--width=COLS",
            "--help",
        ]
    );
    assert_param(&tool, "--block-size=SIZE", ParamType::OptionEquals, Some(ValueType::Number));
    assert_param(
        &tool,
        "--ignore=PATTERN",
        ParamType::OptionEquals,
        Some(ValueType::Custom("pattern".to_string())),
    );
    assert_param(&tool, "--width=COLS", ParamType::OptionEquals, Some(ValueType::String));
}

#[test]
fn test_page_without_options_still_has_description() {
    let extraction = ManPageParser::default().parse(&fixture("true.txt"));
    assert_eq!(extraction.entry_count, 0);
    assert!(extraction.options_heading.is_none());

    let tool = extraction.into_tool("true");
    assert!(tool.parameters.is_empty());
    assert_eq!(
        tool.description.as_deref(),
        Some("The true utility always returns with an exit code of zero.")
    );
}

#[test]
fn test_option_records_match_entry_count() {
    let parser = ManPageParser::default();
    for (command, name) in FIXTURES {
        let extraction = parser.parse(&fixture(name));
        let positional = extraction
            .parameters
            .iter()
            .filter(|param| param.param_type == ParamType::Positional)
            .count();
        assert_eq!(positional, extraction.positional_count, "{name}");
        assert_eq!(
            extraction.parameters.len() - positional,
            extraction.entry_count,
            "{command} ({name})"
        );
    }
}

#[test]
fn test_fixture_output_is_valid_and_ordered() {
    for (command, name) in FIXTURES {
        let tool = parse_man_page(command, &fixture(name));

        let errors = validate_tool(&tool);
        assert!(errors.is_empty(), "{name}: {errors:?}");

        let first_option = tool
            .parameters
            .iter()
            .position(|param| param.param_type != ParamType::Positional)
            .unwrap_or(tool.parameters.len());
        assert!(
            tool.parameters[first_option..]
                .iter()
                .all(|param| param.param_type != ParamType::Positional),
            "{name}: positional records must come first"
        );

        for param in &tool.parameters {
            assert_eq!(
                param.value_type.is_some(),
                param.param_type.takes_value(),
                "{name}: {}",
                param.name
            );
            if let Some(description) = &param.description {
                assert!(!description.is_empty());
                assert!(description.chars().count() <= DESCRIPTION_LIMIT);
            }
        }
    }
}

#[test]
fn test_parse_is_idempotent() {
    for (command, name) in FIXTURES {
        let raw = fixture(name);
        let first = serde_json::to_string(&parse_man_page(command, &raw)).unwrap();
        let second = serde_json::to_string(&parse_man_page(command, &raw)).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn test_spec_examples_in_minimal_page() {
    let page = "\
NAME
     demo - exercise every shape

SYNOPSIS
     demo [options] FILE

OPTIONS
     -i      Perform case insensitive matching.
     -o file   Write output to file.
     --color=when   Mark up matching text.
     --cookie name=value   Add a cookie.
     -A user:pass   Authenticate.
";
    let tool = parse_man_page("demo", page);
    let json = serde_json::to_value(&tool).unwrap();
    let params = json["parameters"].as_array().unwrap();

    assert_eq!(params.len(), 6);
    assert_eq!(
        params[0],
        serde_json::json!({"name": "FILE", "param-type": "positional", "position": 1})
    );
    assert_eq!(
        params[1],
        serde_json::json!({
            "name": "-i",
            "param-type": "flag",
            "description": "Perform case insensitive matching."
        })
    );
    assert_eq!(params[2]["param-type"], "option");
    assert_eq!(params[2]["value-type"], "file-path");
    assert_eq!(params[3]["name"], "--color=when");
    assert_eq!(params[3]["param-type"], "option-equals");
    assert_eq!(params[3]["value-type"], "string");
    assert_eq!(params[4]["name"], "--cookie");
    assert_eq!(params[4]["param-type"], "option-kv-equals");
    assert_eq!(params[4]["value-type"], "string");
    assert_eq!(params[5]["name"], "-A");
    assert_eq!(params[5]["param-type"], "option-kv-colon");
}

#[test]
fn test_custom_dialect_from_yaml() {
    let config = EngineConfig::from_yaml_str(
        r#"
dialect:
  headings:
    - { text: "NAME", kind: name }
    - { text: "PARAMETERS", kind: options }
"#,
    )
    .unwrap();
    let dialect = Dialect::compile(&config.dialect).unwrap();
    let page = "NAME\n     tool - do things\nPARAMETERS\n     -x   Extra.\nOPTIONS\n     -y   Why.\n";

    let tool = parse_man_page_with("tool", page, &dialect);
    assert_eq!(names(&tool), vec!["-x"]);

    let standard = parse_man_page("tool", page);
    assert_eq!(names(&standard), vec!["-y"]);
}
