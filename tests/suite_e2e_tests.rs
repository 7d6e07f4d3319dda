//! End-to-end suite generation
//! Demonstrates: RuleDocument → RuleSet → ScenarioBuilder → ScenarioSuite → JSON

use std::collections::BTreeMap;

use rulecase::runtime::format_number;
use rulecase::{
    evaluate, evaluate_truth, Error, Function, GeneratorOptions, Node, NormItem, ParameterRecord,
    ParameterType, Parameters, RuleDocument, RuleSet, ScenarioBuilder, ScenarioSuite, VarKind,
    VariableDef,
};

/// Entry condition with an OR group, one macro, four variable shapes and a
/// norm with a clamped calculation
fn declaration_rules() -> RuleSet {
    let entry = Node::var("Vx1").gt(Node::constant(0.0)).and(
        Node::var("C1")
            .equals(Node::constant(5.0))
            .or(Node::var("C1").equals(Node::constant(9.0))),
    );

    let variables = vec![
        VariableDef::new("BASE", Node::var("BGLO").sub(Node::var("C106"))),
        VariableDef::new(
            "FLAG",
            Node::conditional(
                Node::var("C1").equals(Node::constant(5.0)),
                Node::constant(1.0),
                Node::constant(0.0),
            ),
        ),
        VariableDef::new(
            "NET",
            Node::call(Function::Pos, vec![Node::var("BASE").sub(Node::var("P36"))]),
        ),
        VariableDef::new(
            "CAP",
            Node::call(Function::Min, vec![Node::var("BASE"), Node::var("P36")]),
        ),
    ];

    let norm = vec![
        NormItem::Condition(Node::var("C50").gt(Node::var("P36"))),
        NormItem::Calculation(VariableDef::new(
            "EXCESS",
            Node::call(Function::Pos, vec![Node::var("C50").sub(Node::var("P36"))]),
        )),
    ];

    let mut macros = BTreeMap::new();
    macros.insert(
        "BGLO".to_string(),
        Node::var("C104").add(Node::var("C105")),
    );

    let document = RuleDocument {
        entry_condition: entry,
        variables,
        norm_observation: norm,
    };
    RuleSet::new(document, macros, Parameters::from_pairs([("P36", 250.0)])).unwrap()
}

/// Parameters on both sides of the entry condition, a POS over a derived
/// difference and a norm with a compound left side
fn compound_rules() -> RuleSet {
    let listed = Node::list(vec![
        Node::var("P36").le(Node::var("Vx2")),
        Node::var("Vx3").ge(Node::var("P36").add(Node::constant(1000.0))),
    ]);
    let entry = Node::var("Vx1")
        .add(Node::var("P36"))
        .gt(Node::constant(0.0))
        .and(listed.or(Node::var("C1").equals(Node::constant(3.0))));

    let variables = vec![
        VariableDef::new("BASE", Node::var("C104").sub(Node::var("C106"))),
        VariableDef::new(
            "NET",
            Node::call(Function::Pos, vec![Node::var("BASE").sub(Node::var("P36"))]),
        ),
    ];

    let left = Node::var("C50").sub(Node::var("C51"));
    let norm = vec![
        NormItem::Condition(left.clone().gt(Node::var("P36"))),
        NormItem::Calculation(VariableDef::new(
            "OVER",
            Node::call(Function::Pos, vec![left.sub(Node::var("P36"))]),
        )),
    ];

    let document = RuleDocument {
        entry_condition: entry,
        variables,
        norm_observation: norm,
    };
    RuleSet::new(document, BTreeMap::new(), Parameters::from_pairs([("P36", 5000.0)])).unwrap()
}

/// Every case must reproduce its label from its own inputs and the
/// parameters alone
fn assert_self_consistent(rules: &RuleSet, suite: &ScenarioSuite) {
    let document = rules.document();
    let norm = document.norm_condition();

    for case in suite.cases() {
        let context = rules.replay(&case.inputs);
        match case.category.as_str() {
            "Cond. OK" => assert!(evaluate_truth(&document.entry_condition, &context), "{:?}", case),
            "Cond. NK" => assert!(!evaluate_truth(&document.entry_condition, &context), "{:?}", case),
            "Norm OK" => {
                if let Some(condition) = norm {
                    assert!(evaluate_truth(condition, &context), "{:?}", case);
                }
                let mut current = context.clone();
                let mut results = Vec::new();
                for calc in document.norm_calculations() {
                    let value = evaluate(&calc.logic, &current);
                    current.insert(calc.target.clone(), value);
                    results.push(format!("{}={}", calc.target, format_number(value)));
                }
                assert_eq!(case.expected, results.join(" "), "{:?}", case);
            }
            "Norm NK" => {
                if let Some(condition) = norm {
                    assert!(!evaluate_truth(condition, &context), "{:?}", case);
                }
            }
            name if document.variables.iter().any(|v| v.target == name) => {
                assert_eq!(case.expected, format_number(context[name]), "{:?}", case);
                if case.description.ends_with("POS > 0") {
                    assert_ne!(case.expected, "0", "{:?}", case);
                }
                if case.description.ends_with("POS = 0") {
                    assert_eq!(case.expected, "0", "{:?}", case);
                }
            }
            _ => {}
        }
    }
}

fn build() -> ScenarioSuite {
    let rules = declaration_rules();
    ScenarioBuilder::with_defaults(&rules).build().unwrap()
}

#[test]
fn test_e2e_entry_condition_paths() {
    let suite = build();

    let ok: Vec<_> = suite.by_category("Cond. OK").collect();
    assert_eq!(ok.len(), 2);
    assert_eq!(
        ok[0].description,
        "Valid path #1: Activating C1=5, Vx1=1000..."
    );
    assert_eq!(
        ok[1].description,
        "Valid path #2: Activating C1=9, Vx1=1000..."
    );

    let nk: Vec<_> = suite.by_category("Cond. NK").collect();
    assert_eq!(nk.len(), 2);
    assert_eq!(nk[0].description, "Forced failure in block #1 (Trigger: Vx1)");
    assert!(!nk[0].inputs.contains_key("Vx1"));
    // the whole OR group is broken at once
    assert_eq!(nk[1].description, "Forced failure in block #2 (Trigger: C1)");
    assert_eq!(nk[1].inputs.get("C1"), Some(&10.0));
    assert_eq!(nk[1].inputs.get("Vx1"), Some(&1000.0));
}

#[test]
fn test_e2e_variable_cases() {
    let suite = build();

    let base: Vec<_> = suite.by_category("BASE").collect();
    assert_eq!(base.len(), 1);
    assert_eq!(base[0].description, "Calc");
    assert_eq!(base[0].expected, "100");
    assert_eq!(base[0].inputs.get("C104"), Some(&100.0));

    let flag: Vec<_> = suite.by_category("FLAG").collect();
    assert_eq!(flag.len(), 2);
    assert_eq!(flag[0].description, "Branch TRUE -> Calc");
    assert_eq!(flag[0].expected, "1");
    assert_eq!(flag[1].description, "Branch FALSE -> Calc");
    assert_eq!(flag[1].inputs.get("C1"), Some(&6.0));
    assert_eq!(flag[1].expected, "0");

    let net: Vec<_> = suite.by_category("NET").collect();
    assert_eq!(net.len(), 2);
    assert_eq!(net[0].expected, "1");
    assert_eq!(net[1].expected, "0");

    let cap: Vec<_> = suite.by_category("CAP").collect();
    assert_eq!(cap.len(), 2);
    assert_eq!(cap[0].description, "MIN: argument 1 wins");
    assert_eq!(cap[0].expected, "50");
    assert_eq!(cap[1].description, "MIN: argument 2 wins");
    assert_eq!(cap[1].expected, "250");
}

#[test]
fn test_e2e_norm_cases() {
    let suite = build();

    let ok: Vec<_> = suite.by_category("Norm OK").collect();
    assert_eq!(ok.len(), 1);
    assert_eq!(ok[0].description, "Boundary met (C50=251 vs 250)");
    assert_eq!(ok[0].expected, "EXCESS=1");

    let nk: Vec<_> = suite.by_category("Norm NK").collect();
    assert_eq!(nk.len(), 1);
    assert_eq!(nk[0].inputs.get("C50"), Some(&250.0));
    assert_eq!(nk[0].expected, "Norm not met");

    let probe: Vec<_> = suite.by_category("POS=0 probe").collect();
    assert_eq!(probe.len(), 1);
    assert_eq!(probe[0].description, "Internal probe (forcing C50=1)");
}

#[test]
fn test_e2e_suite_shape() {
    let suite = build();
    assert_eq!(suite.len(), 14);
    assert!(suite.warnings().is_empty());

    for (i, case) in suite.cases().iter().enumerate() {
        assert_eq!(case.id, 11_468 + i as u64);
        assert!(!case.inputs.contains_key("P36"), "parameter leaked in {:?}", case);
        assert!(case.inputs.values().all(|v| *v != 0.0));
        assert!(!case.inputs.contains_key("BASE"));
    }

    let order: Vec<String> = suite.summary().into_iter().map(|c| c.category).collect();
    assert_eq!(
        order,
        vec![
            "Cond. OK",
            "Cond. NK",
            "BASE",
            "FLAG",
            "NET",
            "CAP",
            "Norm OK",
            "Norm NK",
            "POS=0 probe"
        ]
    );
}

#[test]
fn test_e2e_json_dump() {
    let suite = build();
    let json = suite.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["cases"].as_array().map(Vec::len), Some(14));
    assert_eq!(value["cases"][0]["id"], 11_468);
    assert_eq!(value["cases"][0]["inputs"]["C1"], 5.0);
    assert_eq!(value["summary"][0]["category"], "Cond. OK");
    assert_eq!(value["summary"][0]["count"], 2);
    assert_eq!(value["warnings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_e2e_custom_naming_and_options() {
    let options = GeneratorOptions::from_json(
        r#"{
            "case_id_base": 0,
            "naming": {
                "vector_pattern": "^vec_",
                "code_pattern": "^code_",
                "parameter_pattern": "^param_"
            }
        }"#,
    )
    .unwrap();

    let load = Parameters::from_records(vec![
        ParameterRecord::new("param_x", "5", ParameterType::Number),
        ParameterRecord::new("param_bad", "n/a", ParameterType::Number),
    ]);
    assert_eq!(load.warnings.len(), 1);

    let document = RuleDocument {
        entry_condition: Node::reference("vec_a", VarKind::InputVector)
            .gt(Node::reference("param_x", VarKind::Parameter)),
        ..RuleDocument::default()
    };
    let rules =
        RuleSet::with_options(document, BTreeMap::new(), load.parameters, &options).unwrap();
    assert!(rules.is_input("code_7"));
    assert!(!rules.is_input("C7"));

    let suite = ScenarioBuilder::new(&rules, options).build().unwrap();
    let ok: Vec<_> = suite.by_category("Cond. OK").collect();
    assert_eq!(ok.len(), 1);
    assert_eq!(ok[0].id, 1);
    assert_eq!(ok[0].inputs.get("vec_a"), Some(&1000.0));
    assert!(!ok[0].inputs.contains_key("param_x"));
}

#[test]
fn test_e2e_invalid_naming_pattern_is_fatal() {
    let options = GeneratorOptions::from_json(r#"{"naming": {"code_pattern": "^C("}}"#).unwrap();
    let err = RuleSet::with_options(
        RuleDocument::default(),
        BTreeMap::new(),
        Parameters::default(),
        &options,
    )
    .unwrap_err();
    assert_eq!(err.classify(), rulecase::ErrorSeverity::Fatal);
}

#[test]
fn test_e2e_cases_reproduce_their_labels() {
    let rules = declaration_rules();
    let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
    assert_self_consistent(&rules, &suite);
}

#[test]
fn test_e2e_parameters_and_compound_shapes_stay_consistent() {
    let rules = compound_rules();
    let suite = ScenarioBuilder::with_defaults(&rules).build().unwrap();
    assert_self_consistent(&rules, &suite);

    // the parameter leader is satisfied through the other side
    let ok: Vec<_> = suite.by_category("Cond. OK").collect();
    assert_eq!(ok.len(), 2);
    assert_eq!(ok[0].inputs.get("Vx2"), Some(&5000.0));
    assert_eq!(ok[0].inputs.get("Vx3"), Some(&6000.0));

    // Vx1 + P36 > 0 cannot be broken; only the OR group is sabotaged
    let nk: Vec<_> = suite.by_category("Cond. NK").collect();
    assert_eq!(nk.len(), 2);
    assert!(nk.iter().all(|case| case.inputs.get("C1") == Some(&4.0)));
    assert_eq!(suite.warnings().len(), 1);
    assert!(matches!(suite.warnings()[0], Error::UnbreakableComponent { .. }));

    let net: Vec<_> = suite.by_category("NET").collect();
    assert_eq!(net[0].inputs.get("C104"), Some(&5101.0));
    assert_eq!(net[0].expected, "1");
    assert_eq!(net[1].expected, "0");

    let norm_ok: Vec<_> = suite.by_category("Norm OK").collect();
    assert_eq!(norm_ok[0].description, "Boundary met (C50=6001 vs 5000)");
    assert_eq!(norm_ok[0].expected, "OVER=1");
}
