use reslens::resolution::*;
use reslens::store::Snapshot;
use reslens::types::*;

fn res(id: i64, pid: Option<i64>, name: &str) -> Resource {
    Resource::new(id, pid.map(ResourceId::Int), name)
}

/// A small three-level hierarchy plus an orphan.
fn sample_records() -> Vec<Resource> {
    vec![
        res(1, None, "A"),
        res(2, Some(1), "B"),
        res(3, Some(2), "C"),
        res(4, Some(1), "D"),
        res(5, Some(77), "Orphan"),
    ]
}

#[test]
fn test_resolve_two_levels() {
    let records = vec![res(1, None, "A"), res(2, Some(1), "B")];
    let path = resolve_path(&records[1], &records);
    assert_eq!(path, vec!["A", "B"]);
    assert_eq!(join_path(&path, "-"), "A-B");
}

#[test]
fn test_path_length_is_chain_length_plus_one() {
    let records = sample_records();
    let expected = [("1", 1), ("2", 2), ("3", 3), ("4", 2), ("5", 1)];
    for (id, len) in expected {
        let r = records.iter().find(|r| r.id.key() == id).unwrap();
        let path = resolve_path(r, &records);
        assert_eq!(path.len(), len, "path of {}", id);
        assert_eq!(path.last(), Some(&r.name));
    }
}

#[test]
fn test_orphan_path_is_own_name() {
    let records = sample_records();
    assert_eq!(resolve_path(&records[4], &records), vec!["Orphan"]);
}

#[test]
fn test_cycle_terminates() {
    let records = vec![res(1, Some(2), "A"), res(2, Some(1), "B")];
    let a = resolve_path(&records[0], &records);
    let b = resolve_path(&records[1], &records);
    assert_eq!(a, vec!["B", "A"]);
    assert_eq!(b, vec!["A", "B"]);
}

#[test]
fn test_self_parent_terminates() {
    let records = vec![res(1, Some(1), "Loop")];
    assert_eq!(resolve_path(&records[0], &records), vec!["Loop"]);
}

#[test]
fn test_long_cycle_with_tail_terminates() {
    let records = vec![
        res(1, Some(3), "a"),
        res(2, Some(1), "b"),
        res(3, Some(2), "c"),
        res(4, Some(3), "tail"),
    ];
    let path = resolve_path(&records[3], &records);
    assert_eq!(path, vec!["a", "b", "c", "tail"]);
}

#[test]
fn test_indexed_resolver_matches_linear() {
    let records = sample_records();
    let snapshot = Snapshot::new(records.clone(), 1);
    let resolver = PathResolver::new(&snapshot);
    for r in &records {
        assert_eq!(resolver.resolve(r), resolve_path(r, &records));
    }
    assert_eq!(
        resolver.resolve_id("3"),
        Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
    );
    assert_eq!(resolver.resolve_id("404"), None);
}

#[test]
fn test_string_parent_reference_resolves() {
    let records = vec![
        Resource::new(10, None, "Root"),
        Resource::new("11", Some(ResourceId::Str("10".to_string())), "Leaf"),
    ];
    assert_eq!(resolve_path(&records[1], &records), vec!["Root", "Leaf"]);
}
