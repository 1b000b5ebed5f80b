// tests/batch.rs
use lsys_plot::{
    GrammarRecord, GrammarSpec, LayoutStyle, LsysError, OutputFormat, PlotConfig, Plotter,
    StackFault, WhitespacePolicy, catalog, parse_records,
};

fn spec(record: GrammarRecord) -> GrammarSpec {
    record.validate(WhitespacePolicy::Strip).unwrap()
}

#[test]
fn test_catalog_renders_one_page_per_grammar() {
    let specs = catalog::builtin(WhitespacePolicy::Strip).unwrap();
    assert_eq!(specs.len(), catalog::names().len());

    let plotter = Plotter::new(PlotConfig::default()).unwrap();
    let report = plotter.run(&specs);

    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert_eq!(report.document.pages(), specs.len());
    let text = report.document.as_str();
    assert!(text.contains(&format!("%%Pages: {}\n", specs.len())));
    assert!(text.contains("%%Title: Lindenmayer System Examples"));

    // Pages follow input order.
    let positions: Vec<usize> = specs
        .iter()
        .map(|s| text.find(&format!("%Title: {}\n", s.title())).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_output_is_reproducible() {
    let specs = catalog::builtin(WhitespacePolicy::Strip).unwrap();
    for format in [OutputFormat::PostScript, OutputFormat::Svg] {
        let plotter = Plotter::new(PlotConfig {
            format,
            ..Default::default()
        })
        .unwrap();
        let a = plotter.run(&specs[..3]).document;
        let b = plotter.run(&specs[..3]).document;
        assert_eq!(a, b, "{format:?} output differs between runs");
    }
}

#[test]
fn test_bad_grammar_does_not_abort_batch() {
    let broken = spec(GrammarRecord::new("Broken", 90.0, "F]F").with_order([0, 1]));
    let koch = catalog::by_name("koch", WhitespacePolicy::Strip).unwrap();

    let report = Plotter::new(PlotConfig::default())
        .unwrap()
        .run(&[broken, koch]);

    assert_eq!(report.document.pages(), 1);
    assert_eq!(report.failures.len(), 2);
    for (failure, generation) in report.failures.iter().zip([0, 1]) {
        assert_eq!(failure.title, "Broken");
        assert_eq!(failure.generation, Some(generation));
        assert_eq!(
            failure.source,
            LsysError::MalformedPath {
                offset: 1,
                fault: StackFault::Underflow
            }
        );
    }
    let message = report.failures[0].to_string();
    assert!(message.starts_with("Broken (generation 0): malformed path at symbol 1"));
}

#[test]
fn test_resource_limit_drops_only_the_oversized_figure() {
    let config = PlotConfig {
        max_symbols: 1_000,
        ..Default::default()
    };
    let koch = spec(
        GrammarRecord::new("Koch", 60.0, "+F--F--F")
            .rule('F', "F+F--F+F")
            .with_order([1, 8]),
    );
    let plotter = Plotter::new(config).unwrap();

    let report = plotter.run(std::slice::from_ref(&koch));
    assert_eq!(report.document.pages(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].generation, Some(8));
    assert!(matches!(report.failures[0].source, LsysError::ResourceLimit { limit: 1_000, .. }));

    // The strict sheet API reports the same failure.
    let err = plotter.plot_sheet(&koch).unwrap_err();
    assert_eq!(err.generation, Some(8));
}

#[test]
fn test_record_stream() {
    let text = r#"
        {
          "title": "Hilbert Curve",
          "refs": ["https://www.cs.unh.edu/~charpov/programming-lsystems.html"],
          "start": "X",
          "angle": 90.0,
          "order": [1, 2],
          "rules": { "X": "-YF+XFX+FY-", "Y": "+XF-YFY-FX+" },
          "post_rules": {}
        }

        {
          "title": "Negative",
          "start": "F",
          "angle": 90.0,
          "order": [-1],
          "rules": {}
        }

        [
          { "title": "Koch's Snowflake", "start": "+F--F--F", "angle": 60.0,
            "rules": { "F": "F+F--F+F" } }
        ]
    "#;

    let parsed = parse_records(text, WhitespacePolicy::Strip);
    assert_eq!(parsed.len(), 3);
    assert!(parsed[0].is_ok());
    assert!(matches!(parsed[1], Err(LsysError::Configuration { ref field, .. }) if field == "order"));
    let koch = parsed[2].as_ref().unwrap();
    assert!(koch.order().is_empty());
    assert!(koch.post_rules().is_empty());

    let report = Plotter::new(PlotConfig::default()).unwrap().run_records(text);
    assert_eq!(report.document.pages(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].title, "record 2");
}

#[test]
fn test_truncated_stream_reports_parse_error() {
    let text = r#"{ "title": "A", "start": "F", "angle": 90 } { "title": "#;
    let parsed = parse_records(text, WhitespacePolicy::Strip);
    assert_eq!(parsed.len(), 2);
    assert!(parsed[0].is_ok());
    assert!(matches!(parsed[1], Err(LsysError::Parse(_))));
}

#[test]
fn test_record_round_trip_through_json() {
    let original = catalog::by_name("gosper", WhitespacePolicy::Strip).unwrap();
    let json = serde_json::to_string_pretty(&GrammarRecord::from(&original)).unwrap();
    let parsed = parse_records(&json, WhitespacePolicy::Strip);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].as_ref().unwrap(), &original);
}

#[test]
fn test_default_order_and_drawing_offset() {
    let koch = catalog::by_name("koch", WhitespacePolicy::Strip).unwrap();
    let hilbert = catalog::by_name("hilbert", WhitespacePolicy::Strip).unwrap();

    let plain = Plotter::new(PlotConfig::default()).unwrap();
    assert_eq!(plain.generations(&koch), vec![1, 2, 3, 6]);

    let offset = Plotter::new(PlotConfig {
        offset_drawing_start: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(offset.generations(&koch), vec![0, 1, 2, 5]);
    assert_eq!(offset.generations(&hilbert), vec![1, 2, 3, 6]);
}

#[test]
fn test_grid_layout_config() {
    let config =
        PlotConfig::from_json(r#"{ "layout": { "grid": { "cells_per_row": 2 } }, "format": "svg" }"#)
            .unwrap();
    assert_eq!(config.layout, LayoutStyle::Grid { cells_per_row: 2 });
    assert_eq!(config.format, OutputFormat::Svg);
    assert_eq!(config.margin_factor, 0.9);

    let sheet = Plotter::new(config)
        .unwrap()
        .plot_sheet(&catalog::by_name("hilbert", WhitespacePolicy::Strip).unwrap())
        .unwrap();
    assert_eq!(sheet.figures.len(), 4);
    let first = sheet.figures[0].cell.cell;
    let last = sheet.figures[3].cell.cell;
    assert_eq!(first.width(), last.width());
    assert!(first.min.y > last.max.y - 1e-9);

    let rejected = PlotConfig::from_json(r#"{ "layout": { "grid": { "cells_per_row": 0 } } }"#);
    assert!(rejected.is_err());
}

#[test]
fn test_sheet_header_lists_rules() {
    let sheet = Plotter::new(PlotConfig::default())
        .unwrap()
        .plot_sheet(&catalog::by_name("gosper", WhitespacePolicy::Strip).unwrap())
        .unwrap();
    assert_eq!(
        sheet.header,
        vec![
            "Angle : 60",
            "Order : [1, 2, 3, 4]",
            "Start : A",
            "A : A-B--B+A++AA+B-",
            "B : +A-BB--B-A++A+B",
            "A => F",
            "B => F",
        ]
    );
}

#[test]
fn test_partial_nested_config() {
    let config = PlotConfig::from_json(
        r#"{ "typography": { "title_size": 24 }, "interpreter": { "step_length": 2.0 } }"#,
    )
    .unwrap();
    assert_eq!(config.typography.title_size, 24.0);
    assert_eq!(config.typography.title_font, "Times-Bold");
    assert_eq!(config.typography.attr_size, 12.0);
    assert_eq!(config.interpreter.step_length, 2.0);
    assert_eq!(config.interpreter.max_stack_depth, 4096);
    assert_eq!(config.page, PlotConfig::default().page);
}
