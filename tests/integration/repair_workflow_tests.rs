/*!
 * Integration tests for full repair runs through the controller
 */

use std::collections::HashSet;
use std::fs;

use anyhow::Result;
use annofix::app_config::Config;
use annofix::app_controller::Controller;
use crate::common;

fn run_quietly(
    controller: &Controller,
    input: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<(annofix::RunSummary, String)> {
    let mut out = Vec::new();
    let summary = controller.run_with_output(input, output, &mut out)?;
    Ok((summary, String::from_utf8(out)?))
}

/// Test the documented scenario: ids [1,2,2,5] and a 'Food can' category
#[test]
fn test_run_withDuplicateAndAlias_shouldFixBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[1, 2, 2, 5], &["Food can", "Bottle"])?;
    let controller = Controller::with_config(Config::default())?;

    let (summary, printed) = run_quietly(&controller, &input, None)?;

    let fixed = common::read_json(&input)?;
    assert_eq!(common::annotation_ids(&fixed), vec![1, 2, 6, 5]);
    assert_eq!(common::category_names(&fixed), vec!["Food Can", "Bottle"]);
    assert_eq!(summary.duplicate_ids_fixed(), 1);
    assert_eq!(summary.category_names_fixed(), 1);
    assert_eq!(summary.output_path, input);

    assert!(printed.contains("Fixed duplicate annotation ID: 2 -> 6\n"));
    assert!(printed.contains("Fixed 1 duplicate annotation ID(s)\n"));
    assert!(printed.contains("Fixed category name: 'Food can' -> 'Food Can'\n"));
    assert!(printed.contains("Fixed 1 category name(s)\n"));
    assert!(printed.ends_with("\nDone!\n"));

    Ok(())
}

/// Test that an explicit output path leaves the input untouched
#[test]
fn test_run_withOutputPath_shouldNotModifyInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[3, 3], &["Food can"])?;
    let before = fs::read_to_string(&input)?;
    fs::create_dir(temp_dir.path().join("fixed"))?;
    let output = temp_dir.path().join("fixed").join("annotations.json");
    let controller = Controller::with_config(Config::default())?;

    run_quietly(&controller, &input, Some(&output))?;

    assert_eq!(fs::read_to_string(&input)?, before);
    assert_eq!(common::annotation_ids(&common::read_json(&output)?), vec![3, 4]);

    Ok(())
}

/// Test uniqueness, cardinality, first-wins and monotonic new ids on a messy input
#[test]
fn test_run_withManyDuplicates_shouldHoldIdInvariants() -> Result<()> {
    let ids = [5, 1, 5, 5, 3, 1, 9, 3, 0, 0];
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &ids, &["Bottle", "Can"])?;
    let controller = Controller::with_config(Config::default())?;

    run_quietly(&controller, &input, None)?;

    let fixed = common::annotation_ids(&common::read_json(&input)?);
    assert_eq!(fixed.len(), ids.len());

    let unique: HashSet<u64> = fixed.iter().copied().collect();
    assert_eq!(unique.len(), fixed.len());

    let original_max = *ids.iter().max().unwrap_or(&0);
    let mut first_seen = HashSet::new();
    for (original, new) in ids.iter().zip(&fixed) {
        if first_seen.insert(*original) {
            assert_eq!(original, new);
        } else {
            assert!(*new > original_max);
        }
    }

    Ok(())
}

/// Test that a second run finds nothing and leaves the document unchanged
#[test]
fn test_run_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[7, 7, 2, 2], &["Food can", "Food Can"])?;
    let controller = Controller::with_config(Config::default())?;

    run_quietly(&controller, &input, None)?;
    let after_first = fs::read_to_string(&input)?;
    let (second, printed) = run_quietly(&controller, &input, None)?;

    assert_eq!(second.duplicate_ids_fixed(), 0);
    assert_eq!(second.category_names_fixed(), 0);
    assert!(second.report.is_clean());
    assert_eq!(fs::read_to_string(&input)?, after_first);
    assert!(printed.contains("Fixed 0 duplicate annotation ID(s)"));
    assert!(printed.contains("Fixed 0 category name(s)"));

    Ok(())
}

/// Test that a clean document comes back with the same content
#[test]
fn test_run_withCleanDocument_shouldKeepContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[1, 2, 3], &["food can", "Bottle"])?;
    let original = common::read_json(&input)?;
    let controller = Controller::with_config(Config::default())?;

    let (summary, _) = run_quietly(&controller, &input, None)?;

    assert!(summary.report.is_clean());
    assert_eq!(common::read_json(&input)?, original);

    Ok(())
}

/// Test that configured aliases are applied
#[test]
fn test_run_withConfiguredAlias_shouldRenameCategory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[1], &["Plastic Bag", "Food can"])?;
    let mut config = Config::default();
    config.aliases.insert("Plastic Bag".to_string(), "Plastic bag".to_string());
    let controller = Controller::with_config(config)?;

    let (summary, _) = run_quietly(&controller, &input, None)?;

    assert_eq!(summary.category_names_fixed(), 2);
    assert_eq!(
        common::category_names(&common::read_json(&input)?),
        vec!["Plastic bag", "Food Can"]
    );

    Ok(())
}

/// Test that a schema error aborts the run without writing anything
#[test]
fn test_run_withStringId_shouldFailAndLeaveInputUntouched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = r#"{"annotations": [{"id": 1}, {"id": 1}, {"id": "2"}], "categories": [{"name": "Food can"}]}"#;
    let input = common::create_test_file(temp_dir.path(), "annotations.json", content)?;
    let output = temp_dir.path().join("out.json");
    let controller = Controller::with_config(Config::default())?;

    let error = run_quietly(&controller, &input, Some(&output)).unwrap_err();

    assert!(format!("{:#}", error).contains("annotations[2].id"));
    assert_eq!(fs::read_to_string(&input)?, content);
    assert!(!output.exists());

    Ok(())
}

/// Test that an output path in a missing directory fails and leaves the input alone
#[test]
fn test_run_withMissingOutputDirectory_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[1, 1], &["Food can"])?;
    let before = fs::read_to_string(&input)?;
    let output = temp_dir.path().join("missing").join("annotations.json");
    let controller = Controller::with_config(Config::default())?;

    assert!(run_quietly(&controller, &input, Some(&output)).is_err());
    assert_eq!(fs::read_to_string(&input)?, before);
    assert!(!temp_dir.path().join("missing").exists());

    Ok(())
}

/// Test that a clean run keeps long floats in opaque fields digit for digit
#[test]
fn test_run_withCleanDocument_shouldKeepFloatDigits() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_document(temp_dir.path(), &[1, 2], &["Bottle"])?;
    let controller = Controller::with_config(Config::default())?;

    run_quietly(&controller, &input, None)?;

    let written = fs::read_to_string(&input)?;
    assert!(written.contains("1010.7733279144293"));
    assert!(written.contains("1082.2148853396661"));
    assert!(written.contains("0.30000000000000004"));

    Ok(())
}

/// Test that a missing input file aborts the run
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("missing.json");
    let controller = Controller::with_config(Config::default())?;

    assert!(run_quietly(&controller, &input, None).is_err());
    assert!(!input.exists());

    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_with_config_withAliasChain_shouldFail() {
    let mut config = Config::default();
    config.aliases.insert("Food Can".to_string(), "Food tin".to_string());

    assert!(Controller::with_config(config).is_err());
}
