use crate::issue::{Issue, LintReport};
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::BTreeMap;

/// Formats a [`LintReport`] as SARIF 2.1.0, one rule per category.
pub fn format(report: &LintReport) -> String {
    let all_issues: Vec<&Issue> = report
        .files
        .iter()
        .flat_map(|f| f.issues.iter().chain(f.suppressed.iter()))
        .collect();

    // BTreeMap keeps rule ids sorted, which fixes the rule index order.
    let mut rule_map: BTreeMap<&str, &Issue> = BTreeMap::new();
    for issue in &all_issues {
        rule_map.entry(issue.category.as_str()).or_insert(issue);
    }

    let rule_index: BTreeMap<&str, i64> = rule_map
        .keys()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    // Rule text is per category; pattern specifics go in each result.
    let rules: Vec<ReportingDescriptor> = rule_map
        .iter()
        .map(|(id, issue)| {
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            rule.short_description = Some(
                MultiformatMessageString::builder()
                    .text(issue.category_description.clone())
                    .build(),
            );
            rule
        })
        .collect();

    let results: Vec<SarifResult> = all_issues
        .iter()
        .map(|issue| {
            let level = if issue.suppressed {
                ResultLevel::Note
            } else {
                ResultLevel::Warning
            };

            let mut result = SarifResult::builder()
                .message(
                    Message::builder()
                        .text(format!("{}. {}", issue.problem, issue.recommendation))
                        .build(),
                )
                .build();

            result.rule_id = Some(issue.category.clone());
            result.level = Some(level);
            result.rule_index = rule_index.get(issue.category.as_str()).copied();

            let uri = issue.file.to_string_lossy().replace('\\', "/");
            let mut physical = PhysicalLocation::builder().build();
            physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());
            physical.region = Some(Region::builder().start_line(issue.line as i64).build());

            let mut location = Location::builder().build();
            location.physical_location = Some(physical);
            result.locations = Some(vec![location]);

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("oxidized-bashrc")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
