mod common;

use ::common::graph::{build, Graph, SINK_ID, SINK_LABEL};
use ::common::session::{Session, SessionConfig};

use crate::common::{neighbourhood, KEY_0, KEY_1, PASSPHRASE};

fn ids(graph: &Graph) -> Vec<i64> {
    graph.nodes.iter().map(|node| node.id).collect()
}

#[test]
fn test_graph_centred_on_focal_key() {
    let graph = build(&neighbourhood(), KEY_0, 0.0);
    assert_eq!(ids(&graph), vec![10, 11, 12, SINK_ID]);
    assert_eq!(graph.focal_id(), 10);

    let sink = graph.nodes.last().unwrap();
    assert_eq!(sink.label, SINK_LABEL);
    assert!(sink.is_sink());

    // node defaults apply unless overridden
    assert_eq!(graph.node(11).unwrap().locale, "en");
    assert_eq!(graph.node(12).unwrap().locale, "fr");

    let link = &graph.links[0];
    assert_eq!((link.source, link.target), (10, 11));
    assert_eq!(link.value, 1.5);
    assert_eq!(link.height, 100);
}

#[test]
fn test_filter_keeps_focal_below_threshold() {
    let graph = build(&neighbourhood(), KEY_0, 50.0);
    assert_eq!(ids(&graph), vec![10, 11, SINK_ID]);

    let pairs: Vec<(i64, i64)> = graph.links.iter().map(|l| (l.source, l.target)).collect();
    assert_eq!(pairs, vec![(10, 11), (SINK_ID, 10)]);
}

#[test]
fn test_every_link_endpoint_is_a_node() {
    for percent in [0.0, 10.0, 50.0, 90.0, 100.0] {
        for focal in [KEY_0, KEY_1, "absent"] {
            let graph = build(&neighbourhood(), focal, percent);
            assert_eq!(graph.nodes.last().unwrap().id, SINK_ID);
            let sink_link = graph.links.last().unwrap();
            assert_eq!(sink_link.source, SINK_ID);
            for link in &graph.links {
                assert!(graph.node(link.source).is_some());
                assert!(graph.node(link.target).is_some());
            }
        }
    }
}

#[test]
fn test_node_ids_are_unique() {
    let graph = build(&neighbourhood(), KEY_0, 0.0);
    let mut seen = ids(&graph);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), graph.nodes.len());

    // the same node spelled two ways is rejected, not merged
    assert_eq!(build("digraph { 007; 7 }", KEY_0, 0.0), Graph::empty());
}

#[test]
fn test_session_builds_around_selected_key() {
    let mut session = Session::new(SessionConfig {
        plots_until_new_series: 100,
        ranking_filter: 90.0,
    });
    session.import_mind(PASSPHRASE, 2).unwrap();
    session.select_key(1).unwrap();

    let focal = session.selected_key().unwrap().to_string();
    let graph = session.build_graph(&neighbourhood(), &focal);
    assert_eq!(graph.focal_id(), 11);
    assert_eq!(ids(&graph), vec![11, SINK_ID]);
}
