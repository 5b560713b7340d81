use bpel_sweep::core::Pipeline;
use bpel_sweep::{CliConfig, LocalStorage, SweepPipeline};
use std::fs;
use tempfile::TempDir;

const PROCESS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<process name="Lonely" xmlns:bpws="http://docs.oasis-open.org/wsbpel/2.0/process/executable">
  <partnerLinks>
    <partnerLink name="Forgotten" partnerLinkType="plnk:ForgottenLT" partnerRole="peer"/>
    <partnerLink name="Entry" partnerLinkType="plnk:EntryLT" myRole="receiver"/>
  </partnerLinks>
  <receive partnerLink="Entry"/>
</process>
"#;

const CONTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/" xmlns:plnk="http://docs.oasis-open.org/wsbpel/2.0/plnktype" xmlns:fgt="urn:forgotten" xmlns:ent="urn:entry">
  <plnk:partnerLinkType name="ForgottenLT">
    <plnk:role name="peer">
      <plnk:portType name="fgt:ForgottenPT"/>
    </plnk:role>
  </plnk:partnerLinkType>
  <plnk:partnerLinkType name="EntryLT">
    <plnk:role name="receiver">
      <plnk:portType name="ent:EntryPT"/>
    </plnk:role>
  </plnk:partnerLinkType>
</wsdl:definitions>
"#;

fn cli_config(root: &str) -> CliConfig {
    CliConfig {
        root: root.to_string(),
        process_suffix: ".bpel".to_string(),
        contract_suffix: "Artifacts.wsdl".to_string(),
        component_suffix: ".component".to_string(),
        assume_unique_prefixes: false,
        summary_json: None,
        config: None,
        verbose: false,
    }
}

#[tokio::test]
async fn test_missing_component_is_reported_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Lonely.bpel"), PROCESS).unwrap();
    fs::write(temp_dir.path().join("LonelyArtifacts.wsdl"), CONTRACT).unwrap();
    // no Lonely.component on disk

    let root = temp_dir.path().to_str().unwrap().to_string();
    let pipeline = SweepPipeline::new(LocalStorage::new(root), cli_config(temp_dir.path().to_str().unwrap()));

    let documents = pipeline.discover().await.unwrap();
    let report = pipeline.prune(documents).await.unwrap();

    assert_eq!(report.removed_links, 1);
    assert_eq!(report.diagnostics.len(), 1);
    let (path, reason) = report.diagnostics.iter().next().unwrap();
    assert!(path.ends_with("Lonely.bpel"));
    assert!(reason.contains("component"));

    // the process edit and the intact sibling's cascade both stand
    let process = fs::read_to_string(temp_dir.path().join("Lonely.bpel")).unwrap();
    assert!(!process.contains("Forgotten"));
    let contract = fs::read_to_string(temp_dir.path().join("LonelyArtifacts.wsdl")).unwrap();
    assert!(!contract.contains("ForgottenLT"));
    assert!(!contract.contains("xmlns:fgt"));
    assert!(contract.contains("EntryLT"));
}

#[tokio::test]
async fn test_missing_both_siblings_keeps_the_run_going() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Lonely.bpel"), PROCESS).unwrap();

    let root = temp_dir.path().to_str().unwrap().to_string();
    let pipeline = SweepPipeline::new(LocalStorage::new(root), cli_config(temp_dir.path().to_str().unwrap()));

    let documents = pipeline.discover().await.unwrap();
    let report = pipeline.prune(documents).await.unwrap();

    assert_eq!(report.removed_links, 1);
    // one entry per process document, first reason wins
    assert_eq!(report.diagnostics.len(), 1);

    let process = fs::read_to_string(temp_dir.path().join("Lonely.bpel")).unwrap();
    assert!(!process.contains("Forgotten"));
    assert!(process.contains("Entry"));
}

#[tokio::test]
async fn test_malformed_process_document_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("Broken.bpel"),
        "<process><partnerLinks></process>",
    )
    .unwrap();

    let root = temp_dir.path().to_str().unwrap().to_string();
    let pipeline = SweepPipeline::new(LocalStorage::new(root), cli_config(temp_dir.path().to_str().unwrap()));

    let result = pipeline.discover().await;
    assert!(result.is_err());
}
