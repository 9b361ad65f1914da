//! Unit tests for rn-graph.
//!
//! Most tests run on the arena layout: rings 0.7 / 2.1 / 3.5 / 5.0 with
//! passages 0–1 at 60° and 240°, 1–2 at 0°, 2–3 at 135° and 315°.

use std::f64::consts::PI;

use rn_core::{approx_eq, PassageId, RingId, Vec2};
use rn_map::layouts::{arena, ARENA_CENTER};
use rn_map::{CircularMap, PathwayGeometry, PathwayId};

use crate::{EdgeKey, GraphError, InsertStatus, NavGraph, NodeKind};

// ── Helpers ───────────────────────────────────────────────────────────────────

const MERGE: f64 = 0.2;

fn arena_graph() -> (CircularMap, NavGraph) {
    let map = arena().unwrap();
    let graph = NavGraph::build(&map, MERGE).unwrap();
    (map, graph)
}

fn ring_point(radius: f64, bearing: f64) -> Vec2 {
    ARENA_CENTER + Vec2::from_bearing(bearing) * radius
}

fn assert_same_edges(before: &[EdgeKey], after: &[EdgeKey]) {
    assert_eq!(before.len(), after.len(), "edge count changed");
    for (x, y) in before.iter().zip(after) {
        assert_eq!((x.low, x.high, x.pathway), (y.low, y.high, y.pathway));
        assert!(approx_eq(x.length, y.length), "{x:?} vs {y:?}");
    }
}

// ── Static build ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use super::*;

    #[test]
    fn arena_node_and_edge_counts() {
        let (_, graph) = arena_graph();
        // 10 passage endpoints + one anchor on each of rings 0 and 3.
        assert_eq!(graph.node_count(), 12);
        // 5 passage edges + 3 arcs on each of 4 rings.
        assert_eq!(graph.edge_count(), 17);
        let anchors = graph.nodes().filter(|(_, n)| n.kind == NodeKind::Anchor).count();
        assert_eq!(anchors, 2);
    }

    #[test]
    fn ring_arcs_cover_circumference() {
        let (map, graph) = arena_graph();
        for (i, ring) in map.rings().iter().enumerate() {
            let id = PathwayId::Ring(RingId(i as u16));
            let total: f64 = graph.edges().filter(|(_, e)| e.pathway == id).map(|(_, e)| e.length).sum();
            assert!(approx_eq(total, 2.0 * PI * ring.radius()), "ring {i}: {total}");
        }
    }

    #[test]
    fn passage_edges_have_passage_length() {
        let (map, graph) = arena_graph();
        for (_, e) in graph.edges().filter(|(_, e)| !e.pathway.is_ring()) {
            let PathwayId::Passage(p) = e.pathway else { unreachable!() };
            let passage = map.passage(p).unwrap();
            assert!(approx_eq(e.length, passage.small_point().distance(passage.large_point())));
        }
    }

    #[test]
    fn ring_edges_run_counter_clockwise() {
        let (map, graph) = arena_graph();
        let ring = map.rings()[2];
        for (_, e) in graph.edges().filter(|(_, e)| e.pathway == PathwayId::Ring(RingId(2))) {
            let a = graph.node(e.a).unwrap().position;
            let b = graph.node(e.b).unwrap().position;
            assert!(approx_eq(ring.ccw_arc(a, b), e.length));
        }
    }

    #[test]
    fn single_attachment_ring_gets_two_anchors() {
        let mut map = CircularMap::new(Vec2::ZERO);
        for r in [1.0, 3.0, 5.0] {
            map.add_ring(r).unwrap();
        }
        map.add_passage_between(0, 1, Vec2::new(2.0, 0.0)).unwrap();
        map.add_passage_between(0, 1, Vec2::new(-2.0, 0.0)).unwrap();
        map.add_passage_between(1, 2, Vec2::new(0.0, 4.0)).unwrap();
        let graph = NavGraph::build(&map, MERGE).unwrap();

        let outer = PathwayId::Ring(RingId(2));
        assert_eq!(graph.nodes_on(outer).len(), 3);
        let outer_ring = map.rings()[2];
        let mut bearings: Vec<f64> = graph
            .nodes()
            .filter(|(_, n)| n.kind == NodeKind::Anchor && outer_ring.is_on(n.position))
            .map(|(_, n)| outer_ring.bearing_of(n.position))
            .collect();
        bearings.sort_by(f64::total_cmp);
        assert_eq!(bearings.len(), 2);
        assert!(approx_eq(bearings[0], 210.0) && approx_eq(bearings[1], 330.0), "{bearings:?}");
    }

    #[test]
    fn opposite_attachments_anchor_on_low_to_high_arc() {
        // Rings 0 and 3 each carry two attachments 180° apart.
        let (map, graph) = arena_graph();
        let mut anchors: Vec<(f64, f64)> = graph
            .nodes()
            .filter(|(_, n)| n.kind == NodeKind::Anchor)
            .map(|(_, n)| (n.position.distance(ARENA_CENTER), map.rings()[0].bearing_of(n.position)))
            .collect();
        anchors.sort_by(|x, y| x.0.total_cmp(&y.0));
        assert_eq!(anchors.len(), 2);
        assert!(approx_eq(anchors[0].0, 0.7) && approx_eq(anchors[0].1, 150.0), "{anchors:?}");
        assert!(approx_eq(anchors[1].0, 5.0) && approx_eq(anchors[1].1, 225.0), "{anchors:?}");
        assert!(graph.find_node_near(ring_point(0.7, 330.0)).is_none());
        assert!(graph.find_node_near(ring_point(5.0, 45.0)).is_none());
    }

    #[test]
    fn coincident_endpoints_are_merged() {
        // Two passages at the same bearing share their node on the middle ring.
        let mut map = CircularMap::new(Vec2::ZERO);
        for r in [1.0, 3.0, 5.0] {
            map.add_ring(r).unwrap();
        }
        map.add_passage_between(0, 1, Vec2::new(2.0, 0.0)).unwrap();
        map.add_passage_between(1, 2, Vec2::new(4.0, 0.0)).unwrap();
        let graph = NavGraph::build(&map, MERGE).unwrap();
        let shared = graph.find_node_near(Vec2::new(3.0, 0.0)).unwrap();
        // passage to ring 0, passage to ring 2, two arcs on ring 1
        assert_eq!(graph.degree(shared), 4);
    }

    #[test]
    fn stale_graph_is_rebuilt() {
        let (mut map, mut graph) = arena_graph();
        assert!(!graph.is_stale(&map));
        map.add_ring(7.0).unwrap();
        assert!(graph.is_stale(&map));
        assert!(graph.ensure_current(&map).unwrap());
        assert!(!graph.ensure_current(&map).unwrap());
    }

    #[test]
    fn describe_lists_rings() {
        let (map, graph) = arena_graph();
        let text = graph.describe(&map);
        assert!(text.contains("ring r=0.70"));
        assert!(text.contains("Anchor"));
    }
}

// ── Splicing ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod splice {
    use super::*;

    #[test]
    fn insert_then_remove_on_ring_restores_edges() {
        let (map, mut graph) = arena_graph();
        let before = graph.edge_keys();
        for bearing in [0.0, 100.0, 200.0, 359.0] {
            let ins = graph
                .insert_node(&map, PathwayId::Ring(RingId(0)), ring_point(0.7, bearing), false)
                .unwrap();
            assert!(ins.created);
            assert_eq!(ins.status, InsertStatus::Clean);
            assert_eq!(graph.degree(ins.node), 2);
            assert_eq!(graph.edge_count(), 18);
            graph.remove_node(ins.node).unwrap();
            assert_same_edges(&before, &graph.edge_keys());
        }
    }

    #[test]
    fn insert_then_remove_on_passage_restores_edges() {
        let (map, mut graph) = arena_graph();
        let before = graph.edge_keys();
        let id = PathwayId::Passage(PassageId(2));
        let ins = graph.insert_node(&map, id, ring_point(2.8, 0.0), true).unwrap();
        assert!(graph.node(ins.node).unwrap().is_blocking);
        let halves: Vec<f64> = graph.edges_of(ins.node).map(|(_, e)| e.length).collect();
        assert!(approx_eq(halves.iter().sum::<f64>(), 1.4));
        graph.remove_node(ins.node).unwrap();
        assert_same_edges(&before, &graph.edge_keys());
    }

    #[test]
    fn off_path_position_is_projected() {
        let (map, mut graph) = arena_graph();
        let ins = graph
            .insert_node(&map, PathwayId::Ring(RingId(1)), ring_point(2.4, 100.0), false)
            .unwrap();
        let pos = graph.node(ins.node).unwrap().position;
        assert!(approx_eq(pos.distance(ARENA_CENTER), 2.1));
    }

    #[test]
    fn insert_near_junction_returns_existing_node() {
        let (map, mut graph) = arena_graph();
        let junction = graph.find_node_near(ring_point(0.7, 60.0)).unwrap();
        let ins = graph
            .insert_node(&map, PathwayId::Ring(RingId(0)), ring_point(0.7, 65.0), false)
            .unwrap();
        assert!(!ins.created);
        assert_eq!(ins.node, junction);
        assert_eq!(graph.edge_count(), 17);
    }

    #[test]
    fn stacked_insertions_unwind_in_reverse() {
        let (map, mut graph) = arena_graph();
        let before = graph.edge_keys();
        let ring = PathwayId::Ring(RingId(2));
        let a = graph.insert_node(&map, ring, ring_point(3.5, 40.0), false).unwrap();
        let b = graph.insert_node(&map, ring, ring_point(3.5, 80.0), true).unwrap();
        let c = graph.insert_node(&map, ring, ring_point(3.5, 60.0), false).unwrap();
        assert!(graph.edge_between(a.node, c.node).is_some());
        assert!(graph.edge_between(c.node, b.node).is_some());
        for ins in [c, b, a] {
            graph.remove_node(ins.node).unwrap();
        }
        assert_same_edges(&before, &graph.edge_keys());
    }

    #[test]
    fn missing_edge_is_recovered() {
        let (map, mut graph) = arena_graph();
        let ring = PathwayId::Ring(RingId(1));
        // Ring 1 nodes sit at 0°, 60° and 240°; drop the 0° → 60° arc.
        let n0 = graph.find_node_near(ring_point(2.1, 0.0)).unwrap();
        let n60 = graph.find_node_near(ring_point(2.1, 60.0)).unwrap();
        let arc = graph.edge_between(n0, n60).unwrap();
        graph.delete_edge(arc);

        let ins = graph.insert_node(&map, ring, ring_point(2.1, 30.0), false).unwrap();
        assert_eq!(ins.status, InsertStatus::Recovered);
        assert!(graph.edge_between(n0, ins.node).is_some());
        assert!(graph.edge_between(ins.node, n60).is_some());
    }

    #[test]
    fn junction_is_not_removable() {
        let (_, mut graph) = arena_graph();
        let junction = graph.find_node_near(ring_point(2.1, 0.0)).unwrap();
        assert_eq!(
            graph.remove_node(junction),
            Err(GraphError::NotRemovable { node: junction, degree: 3 })
        );
    }

    #[test]
    fn anchor_removal_would_duplicate_edge() {
        let (_, mut graph) = arena_graph();
        let anchor = graph.find_node_near(ring_point(0.7, 150.0)).unwrap();
        assert!(matches!(graph.remove_node(anchor), Err(GraphError::NotRemovable { degree: 2, .. })));
    }

    #[test]
    fn unknown_pathway_rejected() {
        let (map, mut graph) = arena_graph();
        let bogus = PathwayId::Passage(PassageId(40));
        assert_eq!(
            graph.insert_node(&map, bogus, ARENA_CENTER, false),
            Err(GraphError::UnknownPathway(bogus))
        );
    }
}

// ── Primitives ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod primitives {
    use super::*;

    fn ring0() -> PathwayId {
        PathwayId::Ring(RingId(0))
    }

    #[test]
    fn duplicate_edge_rejected() {
        let mut graph = NavGraph::new(MERGE);
        let a = graph.add_node(Vec2::new(0.0, 0.0), NodeKind::Junction, false);
        let b = graph.add_node(Vec2::new(1.0, 0.0), NodeKind::Junction, false);
        graph.connect(a, b, 1.0, ring0()).unwrap();
        assert_eq!(graph.connect(b, a, 1.0, ring0()), Err(GraphError::DuplicateEdge { a: b, b: a }));
        assert_eq!(graph.connect(a, a, 0.0, ring0()), Err(GraphError::SelfLoop(a)));
    }

    #[test]
    fn merge_rewires_and_drops_redundant_edges() {
        let mut graph = NavGraph::new(MERGE);
        let keep = graph.add_node(Vec2::new(0.0, 0.0), NodeKind::Junction, false);
        let dup = graph.add_node(Vec2::new(0.1, 0.0), NodeKind::Junction, false);
        let x = graph.add_node(Vec2::new(5.0, 0.0), NodeKind::Junction, false);
        let y = graph.add_node(Vec2::new(0.0, 5.0), NodeKind::Junction, false);
        graph.connect(keep, x, 5.0, ring0()).unwrap();
        graph.connect(dup, x, 4.9, ring0()).unwrap();
        graph.connect(dup, y, 5.0, ring0()).unwrap();
        graph.connect(keep, dup, 0.1, ring0()).unwrap();

        graph.merge(keep, dup).unwrap();
        assert!(graph.node(dup).is_none());
        assert_eq!(graph.degree(keep), 2);
        assert!(graph.edge_between(keep, y).is_some());
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.find_node_near(Vec2::new(0.1, 0.0)), Some(keep));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut graph = NavGraph::new(MERGE);
        let a = graph.add_node(Vec2::new(0.0, 0.0), NodeKind::Transient, false);
        graph.delete_node(a).unwrap();
        let b = graph.add_node(Vec2::new(3.0, 0.0), NodeKind::Transient, false);
        assert_eq!(a, b);
        assert_eq!(graph.find_node_near(Vec2::ZERO), None);
    }

    #[test]
    fn blocking_flag_round_trips() {
        let mut graph = NavGraph::new(MERGE);
        let a = graph.add_node(Vec2::ZERO, NodeKind::Junction, false);
        assert_eq!(graph.set_blocking(a, true), Ok(false));
        assert!(graph.node(a).unwrap().is_blocking);
    }
}
