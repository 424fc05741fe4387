use ah_process::{
    AirStream, CoilDuty, CoilParams, MixingParams, MixingShare, Process, ProcessKind, StreamKind,
};
use ah_project::{
    DesignDocument, ProjectError, load_json, load_yaml, save_json, save_yaml, validate_document,
};
use ah_psychro::{PsychrometricConstants, Season, StateInput, StatePoint};

fn mixing_document() -> DesignDocument {
    let mut doc = DesignDocument::new("Mixing box");
    doc.conditions.altitude = Some(350.0);
    doc.constants = Some(PsychrometricConstants::standard().with_tolerance(1e-9));
    doc.state_points = vec![
        StatePoint::new("oa")
            .with_name("Outdoor")
            .with_season(Season::Summer)
            .with_input(StateInput::DryBulbWetBulb {
                dry_bulb: 32.0,
                wet_bulb: 24.0,
            }),
        StatePoint::new("ra").with_input(StateInput::DryBulbEnthalpy {
            dry_bulb: 26.0,
            enthalpy: 52.9,
        }),
        StatePoint::new("mix"),
        StatePoint::new("off-coil"),
    ];
    doc.processes = vec![
        Process::new(
            "mixing",
            "oa",
            "mix",
            ProcessKind::Mixing(MixingParams {
                from_share: MixingShare::Airflow { airflow: 1500.0 },
                with_point: "ra".into(),
                with_share: MixingShare::Airflow { airflow: 3500.0 },
            }),
        )
        .with_season(Season::Summer)
        .with_order(1),
        Process::new(
            "cooling",
            "mix",
            "off-coil",
            ProcessKind::Cooling(CoilParams {
                airflow: 5000.0,
                duty: CoilDuty::Capacity { capacity: 28.0 },
                shf: Some(0.7),
                water_temp_diff: Some(5.0),
            }),
        )
        .with_season(Season::Summer)
        .with_order(2),
    ];
    doc.air_streams = vec![
        AirStream::new("sa", StreamKind::Supply, 5000.0, "off-coil"),
        AirStream::new("oa", StreamKind::Outdoor, 1500.0, "oa").with_mass_flow(1620.0),
    ];
    doc
}

#[test]
fn roundtrip_yaml_empty_document() {
    let doc = DesignDocument::new("Empty Document");
    validate_document(&doc).unwrap();

    let path = std::env::temp_dir().join("ah_project_roundtrip_empty.yaml");
    save_yaml(&path, &doc).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(doc, loaded);
}

#[test]
fn roundtrip_yaml_mixing_document() {
    let doc = mixing_document();
    validate_document(&doc).unwrap();

    let path = std::env::temp_dir().join("ah_project_roundtrip_mixing.yaml");
    save_yaml(&path, &doc).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(doc, loaded);
}

#[test]
fn roundtrip_json_mixing_document() {
    let doc = mixing_document();

    let path = std::env::temp_dir().join("ah_project_roundtrip_mixing.json");
    save_json(&path, &doc).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(doc, loaded);
}

#[test]
fn save_refuses_invalid_document() {
    let mut doc = mixing_document();
    doc.processes[1].to = "nowhere".into();

    let path = std::env::temp_dir().join("ah_project_invalid.yaml");
    let result = save_yaml(&path, &doc);
    assert!(matches!(result, Err(ProjectError::Validation(_))));
}

#[test]
fn evaluate_mixing_document() {
    let doc = mixing_document();
    let eval = ah_project::evaluate(
        &doc,
        Season::Summer,
        &ah_project::EvaluateOptions { wet_bulb: true },
    )
    .unwrap();

    assert!(eval.pressure < 101.325);
    let off_coil = eval.point("off-coil").unwrap();
    assert!(off_coil.is_resolved());
    assert!(off_coil.properties.wet_bulb.is_some());

    let cooling = eval.process("cooling").unwrap().results.unwrap();
    assert!((cooling.total_heat.unwrap() + 28.0).abs() < 1e-9);

    let balance = eval.balance.as_ref().unwrap();
    assert_eq!(balance.total_supply, 5000.0);
    assert!(!balance.balanced);
    // 1500 m³/h of 32 °C outdoor air at 350 m is roughly 1620 kg/h
    assert!(eval.mass_flow_errors.is_empty(), "{:?}", eval.mass_flow_errors);
}

#[test]
fn winter_evaluation_skips_summer_items() {
    let doc = mixing_document();
    let eval = ah_project::evaluate(
        &doc,
        Season::Winter,
        &ah_project::EvaluateOptions::default(),
    )
    .unwrap();

    assert!(eval.processes.is_empty());
    assert!(eval.point("oa").is_none());
    assert!(eval.point("ra").unwrap().is_resolved());
    assert!(!eval.point("mix").unwrap().is_resolved());
}
