//! Man-page parsing example.
//!
//! Parses a rendered manual page held in memory, without running `man`, and
//! prints the resulting tool schema.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p manpage-schema-discovery --example parse_man
//! ```

use manpage_schema_core::validate_tool;
use manpage_schema_discovery::output::{OutputFormat, render_tool};
use manpage_schema_discovery::parse_man_page;

fn main() {
    let page = r#"
NAME
     wc - word, line, character, and byte count

SYNOPSIS
     wc [-Lclmw] [--libxo] [file ...]

DESCRIPTION
     The wc utility displays the number of lines, words, and bytes contained
     in each input file, or standard input (if no file is specified) to the
     standard output.

     The following options are available:

     --libxo
             Generate output via libxo(3) in a selection of different human
             and machine readable formats.

     -L      Write the length of the line containing the most bytes.

     -c      The number of bytes in each input file is written to the
             standard output.

     -l      The number of lines in each input file is written to the
             standard output.
"#;

    let tool = parse_man_page("wc", page);

    println!("Description: {}", tool.description.as_deref().unwrap_or("-"));
    println!("\nParameters:");
    for param in &tool.parameters {
        match param.position {
            Some(position) => println!("  {position}. {}", param.name),
            None => println!("  {:<10} {}", param.name, param.param_type),
        }
    }

    let errors = validate_tool(&tool);
    if !errors.is_empty() {
        println!("\nValidation errors:");
        for error in &errors {
            println!("  - {error}");
        }
    }

    match render_tool(&tool, OutputFormat::Json, true) {
        Ok(json) => println!("\n{json}"),
        Err(e) => eprintln!("Failed to render: {e}"),
    }
}
