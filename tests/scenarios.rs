use std::num::ParseIntError;

use anyhow::Context;
use capturer::{CapturedErrors, Capturer, ErrorCollector};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn parse(value: &str) -> anyhow::Result<i64> {
    value
        .parse::<i64>()
        .with_context(|| format!("invalid literal for integer: {value:?}"))
}

fn messages(captured: &CapturedErrors) -> Vec<String> {
    captured.iter().map(|e| e.to_string()).collect()
}

#[test]
fn capture() {
    init_tracing();

    let result = Capturer::<anyhow::Error>::scope(|capturer| {
        for value in ["one", "2", "three"] {
            capturer.capture(|| parse(value));
        }
        Ok(())
    });

    let captured = result.unwrap_err();
    assert_eq!(
        messages(&captured),
        vec![
            "invalid literal for integer: \"one\"",
            "invalid literal for integer: \"three\"",
        ],
    );
}

#[test]
fn no_capture() {
    init_tracing();

    let result = Capturer::<anyhow::Error>::scope(|_| {
        parse("four")?;
        Ok(())
    });

    let captured = result.unwrap_err();
    assert_eq!(messages(&captured), vec!["invalid literal for integer: \"four\""]);
}

#[test]
fn combined() {
    init_tracing();

    let result = Capturer::<anyhow::Error>::scope(|capturer| {
        for value in ["one", "2", "three"] {
            capturer.capture(|| parse(value));
        }
        parse("four")?;
        Ok(())
    });

    let captured = result.unwrap_err();
    assert_eq!(
        messages(&captured),
        vec![
            "invalid literal for integer: \"one\"",
            "invalid literal for integer: \"three\"",
            "invalid literal for integer: \"four\"",
        ],
    );
}

#[test]
fn body_stops_at_uncaptured_error() {
    init_tracing();

    let mut reached = false;
    let result = Capturer::<anyhow::Error>::scope(|_| {
        parse("four")?;
        reached = true;
        Ok(())
    });

    assert!(result.is_err());
    assert!(!reached);
}

#[test]
fn successful_scope_returns_value() {
    init_tracing();

    let result = Capturer::<anyhow::Error>::scope(|capturer| {
        let values: Vec<i64> = ["1", "2", "3"]
            .into_iter()
            .filter_map(|value| capturer.capture(|| parse(value)))
            .collect();
        Ok(values.iter().sum::<i64>())
    });

    assert_eq!(result.unwrap(), 6);
}

#[test]
fn original_error_kinds_are_preserved() {
    init_tracing();

    #[derive(Debug, thiserror::Error)]
    #[error("custom failure {0}")]
    struct Custom(u32);

    let mut capturer: Capturer = Capturer::new();
    capturer.capture(|| "x".parse::<u8>());
    capturer.capture(|| Err::<(), _>(Custom(7)));
    capturer.record(parse("y"));

    let captured = capturer.finish().unwrap_err();
    let errors = captured.errors();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].downcast_ref::<ParseIntError>().is_some());
    assert_eq!(errors[1].downcast_ref::<Custom>().map(|c| c.0), Some(7));
    assert!(errors[2].downcast_ref::<ParseIntError>().is_some());
    assert_eq!(errors[2].to_string(), "invalid literal for integer: \"y\"");
}

#[test]
fn aggregate_message_is_fixed() {
    init_tracing();

    let single = Capturer::<anyhow::Error>::scope(|_| parse("a").map(drop)).unwrap_err();
    let many = Capturer::<anyhow::Error>::scope(|capturer| {
        capturer.capture(|| parse("b"));
        capturer.capture(|| parse("c"));
        parse("d").map(drop)
    })
    .unwrap_err();

    assert_eq!(single.to_string(), "multiple failures were captured");
    assert_eq!(many.to_string(), "multiple failures were captured");
    assert_eq!(many.len(), 3);
}

#[test]
fn aggregate_is_a_std_error() {
    init_tracing();

    let captured = Capturer::<anyhow::Error>::scope(|_| parse("a").map(drop)).unwrap_err();

    // Can be propagated further with `?` like any other error
    let wrapped: anyhow::Error = captured.into();
    let captured = wrapped.downcast::<CapturedErrors>().unwrap();
    assert_eq!(captured.len(), 1);
}

#[test]
fn manual_exit_with_success_and_no_errors() {
    init_tracing();

    let capturer: Capturer = Capturer::new();
    let value = capturer.exit(Ok::<_, anyhow::Error>("done")).unwrap();
    assert_eq!(value, "done");
}

#[test]
fn manual_exit_with_success_but_captured_errors() {
    init_tracing();

    let mut capturer: Capturer = Capturer::new();
    capturer.capture(|| parse("one"));

    let captured = capturer.exit(Ok::<_, anyhow::Error>("done")).unwrap_err();
    assert_eq!(messages(&captured), vec!["invalid literal for integer: \"one\""]);
}

#[test]
fn helpers_can_record_into_any_collector() {
    init_tracing();

    fn parse_all(values: &[&str], errors: &mut impl ErrorCollector<anyhow::Error>) -> Vec<i64> {
        values.iter().filter_map(|value| errors.record(parse(value))).collect()
    }

    let mut capturer: Capturer = Capturer::new();
    assert_eq!(parse_all(&["1", "x", "3"], &mut capturer), vec![1, 3]);
    assert_eq!(capturer.len(), 1);
    capturer.finish().unwrap_err();

    let mut plain: Vec<anyhow::Error> = vec![];
    assert_eq!(parse_all(&["x", "y"], &mut plain), Vec::<i64>::new());
    assert_eq!(plain.len(), 2);
}
