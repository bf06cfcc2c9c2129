use sarstack::{NeighborSelector, Product, ReferenceStrategy, StackAssembler, StackError};
use serde_json::json;

fn scene(name: &str, start_time: &str) -> Product {
    Product::from_feature(json!({
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[
                [-118.2, 34.0], [-117.1, 34.0], [-117.1, 35.1], [-118.2, 35.1], [-118.2, 34.0]
            ]]
        },
        "properties": {
            "sceneName": name,
            "platform": "Sentinel-1A",
            "startTime": start_time
        }
    }))
    .unwrap()
}

/// Assemble a stack bounded at the reference's own acquisition date, the way
/// neighbor selection requires
fn prior_stack(reference: &Product, candidates: &[Product]) -> sarstack::Stack {
    let end = reference.start_time().unwrap();
    StackAssembler::assemble(
        reference,
        candidates,
        None,
        Some(end),
        ReferenceStrategy::FailFast,
    )
    .unwrap()
}

#[test]
fn test_depth_three_selection() {
    env_logger::init();

    let reference = scene("REF", "2021-04-16T01:30:00");
    let candidates = vec![
        scene("P4", "2021-02-27T01:30:00"),
        scene("P3", "2021-03-11T01:30:00"),
        scene("P2", "2021-03-23T01:30:00"),
        scene("P1", "2021-04-04T01:30:00"),
        reference.clone(),
        scene("FUTURE", "2021-04-28T01:30:00"),
    ];

    let stack = prior_stack(&reference, &candidates);
    println!("Assembled prior stack of {} entries", stack.len());

    let neighbors = NeighborSelector::nearest_prior_neighbors(&reference, 3, &stack)
        .expect("Failed to select neighbors");

    let names: Vec<&str> = neighbors.iter().map(|p| p.id().unwrap()).collect();
    assert_eq!(names, vec!["P3", "P2", "P1"]);
}

#[test]
fn test_single_prior_entry_is_not_an_error() {
    let reference = scene("REF", "2021-04-16T01:30:00");
    let candidates = vec![scene("ONLY", "2021-04-04T01:30:00"), reference.clone()];

    let stack = prior_stack(&reference, &candidates);
    let neighbors = NeighborSelector::nearest_prior_neighbors(&reference, 3, &stack).unwrap();

    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].id(), Some("ONLY"));
}

#[test]
fn test_invalid_depth() {
    let reference = scene("REF", "2021-04-16T01:30:00");
    let stack = prior_stack(&reference, &[reference.clone()]);

    match NeighborSelector::nearest_prior_neighbors(&reference, 0, &stack) {
        Err(StackError::InvalidDepth(0)) => {}
        other => panic!("expected InvalidDepth, got {:?}", other),
    }
}

#[test]
fn test_neighbors_are_sorted_ascending() {
    let reference = scene("REF", "2021-04-16T01:30:00");
    let candidates = vec![
        scene("P1", "2021-04-04T01:30:00"),
        scene("P3", "2021-03-11T01:30:00"),
        scene("P2", "2021-03-23T01:30:00"),
        reference.clone(),
    ];

    let stack = prior_stack(&reference, &candidates);
    let neighbors = NeighborSelector::nearest_prior_neighbors(&reference, 5, &stack).unwrap();

    let times: Vec<_> = neighbors.iter().map(|p| p.start_time().unwrap()).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
}
