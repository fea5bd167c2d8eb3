//! Integration tests for the dependency graph engine.
//!
//! Graphs are built from documents exactly as the converters produce them,
//! so these also cover the name-keyed collapse of the adjacency map.

use sbom_analyzer::model::{Dependency, Document, Package, SbomFormat};
use sbom_analyzer::{build_tree, parse_sbom_str, Analyzer, DependencyGraph};

fn document(edges: &[(&str, &[&str])]) -> Document {
    let mut doc = Document::new(SbomFormat::CycloneDx, "1.5", "graph");
    for (name, deps) in edges {
        let mut package = Package::new(*name, *name);
        for dep in *deps {
            package = package.with_dependency(Dependency::new(*dep, *dep));
        }
        doc.packages.push(package);
    }
    doc
}

#[test]
fn test_diamond_depths() {
    let doc = document(&[
        ("app", &["left", "right"]),
        ("left", &["base"]),
        ("right", &["base"]),
        ("base", &[]),
    ]);
    let tree = build_tree(&doc);

    assert_eq!(tree.depth_map["app"], 2);
    assert_eq!(tree.depth_map["left"], 1);
    assert_eq!(tree.depth_map["base"], 0);
    assert_eq!(tree.root_packages, vec!["base"]);
    assert_eq!(tree.total_dependencies, 4);
    assert!(!tree.has_cycles());
}

#[test]
fn test_longest_path_wins() {
    let doc = document(&[
        ("a", &["d", "b"]),
        ("b", &["c"]),
        ("c", &["d"]),
        ("d", &[]),
    ]);
    assert_eq!(build_tree(&doc).depth_map["a"], 3);
}

#[test]
fn test_three_node_cycle() {
    let doc = document(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
    let tree = build_tree(&doc);

    assert_eq!(tree.cycles, vec![vec!["a", "b", "c", "a"]]);
    assert!(tree.root_packages.is_empty());
    // every node still gets a finite depth
    assert_eq!(tree.depth_map.len(), 3);
}

#[test]
fn test_cycle_behind_entry_node() {
    let doc = document(&[("entry", &["x"]), ("x", &["y"]), ("y", &["x"])]);
    let cycles = DependencyGraph::from_document(&doc).cycles();

    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0], vec!["x", "y", "x"]);
}

#[test]
fn test_roots_have_no_outgoing_edges() {
    let doc = document(&[
        ("app", &["lib"]),
        ("lib", &[]),
        ("tool", &[]),
        ("plugin", &["app"]),
    ]);
    let graph = DependencyGraph::from_document(&doc);
    let roots = graph.roots();

    assert_eq!(roots, vec!["lib", "tool"]);
    for root in &roots {
        assert!(graph.adjacency()[root].is_empty());
    }
}

#[test]
fn test_analyzer_and_tree_agree_on_depth() {
    let doc = document(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"]), ("d", &["a"])]);
    let tree = build_tree(&doc);
    let analysis = Analyzer::new().analyze(&doc);

    for (name, depth) in &tree.depth_map {
        assert_eq!(analysis.dependency_depth[name], *depth, "{name}");
    }
    assert_eq!(analysis.max_depth(), tree.max_depth);
}

#[test]
fn test_spdx_relationship_edges() {
    let content = r#"{
        "spdxVersion": "SPDX-2.3",
        "name": "rel",
        "packages": [
            {"SPDXID": "SPDXRef-a", "name": "a"},
            {"SPDXID": "SPDXRef-b", "name": "b"},
            {"SPDXID": "SPDXRef-c", "name": "c"}
        ],
        "relationships": [
            {"spdxElementId": "SPDXRef-a", "relationshipType": "DEPENDS_ON", "relatedSpdxElement": "SPDXRef-b"},
            {"spdxElementId": "SPDXRef-c", "relationshipType": "DEPENDENCY_OF", "relatedSpdxElement": "SPDXRef-b"},
            {"spdxElementId": "SPDXRef-a", "relationshipType": "CONTAINS", "relatedSpdxElement": "SPDXRef-c"}
        ]
    }"#;
    let doc = parse_sbom_str(content).unwrap();
    let tree = build_tree(&doc);

    assert_eq!(tree.dependency_graph["a"], vec!["b"]);
    // DEPENDENCY_OF points the edge from the related element
    assert_eq!(tree.dependency_graph["b"], vec!["c"]);
    assert_eq!(tree.total_dependencies, 2);
    assert_eq!(tree.depth_map["a"], 2);
}

#[test]
fn test_deep_chain_is_iterative() {
    let names: Vec<String> = (0..50_000).map(|i| format!("p{i}")).collect();
    let mut doc = Document::new(SbomFormat::Spdx, "SPDX-2.3", "deep");
    for (i, name) in names.iter().enumerate() {
        let mut package = Package::new(name.as_str(), name.as_str());
        if let Some(next) = names.get(i + 1) {
            package = package.with_dependency(Dependency::new(next.as_str(), next.as_str()));
        }
        doc.packages.push(package);
    }
    // close the chain into one long cycle
    if let Some(last) = doc.packages.last_mut() {
        last.dependencies.push(Dependency::new("p0", "p0"));
    }

    let tree = build_tree(&doc);
    assert_eq!(tree.cycles.len(), 1);
    assert_eq!(tree.cycles[0].len(), 50_001);
    assert!(tree.max_depth >= 49_999);
}
