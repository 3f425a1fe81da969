//! Integration tests for project runs over files on disk

use std::fs;
use std::path::PathBuf;

use curtsy_core::doc::{FileErrorKind, ParseOptions, TypeKind};
use curtsy_core::parser::ParseError;
use curtsy_core::{DocConfig, Project, SectionLayout};
use tempfile::TempDir;

const SHAPES: &str = r#"// # Shapes
// Basic geometry.
using System;

namespace Geometry
{
    /// <summary>A circle.</summary>
    public class Circle : IShape
    {
        public double Radius;
    }

    // #region Interfaces
    public interface IShape { }
    // #endregion

    public struct Point<T> where T : struct
    {
    }

    public delegate void Moved(Point<int> to);
}
"#;

const COLORS: &str = "/*\n * Colors used by shapes.\n */\nenum Color\n{\n    Red, // warm\n    Blue\n}";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_registry_spans_files() {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        write(&dir, "src/Shapes.cs", SHAPES),
        write(&dir, "src/style/Colors.cs", COLORS),
    ];
    let project = Project::new(sources, dir.path().join("src"), ParseOptions::default()).unwrap();
    let doc = project.parse().unwrap();

    let types: Vec<_> = doc
        .types
        .iter()
        .map(|d| (d.name.as_str(), d.kind, d.file.as_str(), d.line))
        .collect();
    assert_eq!(
        types,
        vec![
            ("Circle", TypeKind::Class, "Shapes.cs", 8),
            ("IShape", TypeKind::Interface, "Shapes.cs", 14),
            ("Point<T>", TypeKind::Struct, "Shapes.cs", 17),
            ("Moved", TypeKind::Delegate, "Shapes.cs", 21),
            ("Color", TypeKind::Enum, "style/Colors.cs", 4),
        ]
    );

    let links = doc.links_from("style/Colors.cs");
    assert_eq!(links.len(), 4);
    assert!(links.iter().all(|l| l.href == "../shapes.html"));
}

#[test]
fn test_sections_cover_each_file() {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        write(&dir, "Shapes.cs", SHAPES),
        write(&dir, "Colors.cs", COLORS),
    ];
    for layout in [SectionLayout::Alternating, SectionLayout::Paired] {
        let options = ParseOptions {
            layout,
            ..ParseOptions::default()
        };
        let project = Project::new(sources.clone(), dir.path(), options).unwrap();
        let doc = project.parse().unwrap();

        for (unit, source) in doc.units.iter().zip([SHAPES, COLORS]) {
            let mut next = 1;
            for section in &unit.sections {
                assert_eq!(section.start_line, next, "{} ({layout})", unit.name);
                next = section.end_line + 1;
            }
            assert_eq!(next - 1, source.lines().count(), "{} ({layout})", unit.name);
        }
    }
}

#[test]
fn test_docs_are_cleaned() {
    let dir = TempDir::new().unwrap();
    let sources = vec![write(&dir, "Shapes.cs", SHAPES), write(&dir, "Colors.cs", COLORS)];
    let project = Project::new(sources, dir.path(), ParseOptions::default()).unwrap();
    let doc = project.parse().unwrap();

    let shapes = doc.unit("Shapes.cs").unwrap();
    assert_eq!(shapes.sections[0].docs, "# Shapes\nBasic geometry.");
    assert!(shapes.sections.iter().all(|s| !s.docs.contains("#region")));

    let colors = doc.unit("Colors.cs").unwrap();
    assert_eq!(colors.sections[0].docs, "\nColors used by shapes.\n");
    // The trailing comment does not make its line a comment line
    assert_eq!(colors.sections[1].code_start_line, Some(4));
    assert!(colors.sections[1].code.contains("Red, // warm"));
    assert_eq!(colors.sections.len(), 2);
}

#[test]
fn test_lenient_run_reports_every_failure() {
    let dir = TempDir::new().unwrap();
    let sources = vec![
        write(&dir, "Open.cs", "// fine\nvar s = 'x;\n"),
        write(&dir, "Shapes.cs", SHAPES),
        write(&dir, "Twice.cs", "class A {}\nstruct A {}\n"),
    ];
    let project = Project::new(sources, dir.path(), ParseOptions::default()).unwrap();

    assert!(project.parse().is_err());

    let (doc, failures) = project.parse_lenient();
    assert_eq!(doc.units.len(), 1);
    assert_eq!(doc.types.len(), 4);
    assert_eq!(failures.len(), 2);
    assert!(failures[0].path.ends_with("Open.cs"));
    assert!(matches!(
        failures[0].kind,
        FileErrorKind::Parse(ParseError::Lex(_))
    ));
    assert_eq!(failures[0].line(), Some(2));
    assert_eq!(failures[1].line(), Some(2));
    assert!(failures[1].to_string().contains("duplicate type 'A'"));
}

#[test]
fn test_config_drives_a_run() {
    let dir = TempDir::new().unwrap();
    write(&dir, "src/Shapes.cs", SHAPES);
    write(&dir, "src/Colors.cs", COLORS);
    let config_path = write(
        &dir,
        "curtsy.toml",
        "root = \"src\"\nsources = [\"src/*.cs\"]\nlayout = \"paired\"\n",
    );

    let config = DocConfig::from_path(&config_path).unwrap();
    let sources = config.resolve_sources(dir.path()).unwrap();
    let project = Project::new(
        sources,
        config.resolve_root(dir.path()),
        config.parse_options(),
    )
    .unwrap();
    let doc = project.parse().unwrap();

    let names: Vec<_> = doc.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Colors.cs", "Shapes.cs"]);
    // Paired layout attaches the header docs to the code below them
    let first = &doc.unit("Shapes.cs").unwrap().sections[0];
    assert_eq!(first.docs, "# Shapes\nBasic geometry.");
    assert_eq!(first.code_start_line, Some(3));
}

#[test]
fn test_project_doc_serializes() {
    let dir = TempDir::new().unwrap();
    let sources = vec![write(&dir, "Colors.cs", COLORS)];
    let project = Project::new(sources, dir.path(), ParseOptions::default()).unwrap();
    let doc = project.parse().unwrap();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["units"][0]["name"], "Colors.cs");
    assert_eq!(json["units"][0]["sections"][0]["code_start_line"], serde_json::Value::Null);
    assert_eq!(json["types"][0]["kind"], "enum");
}
