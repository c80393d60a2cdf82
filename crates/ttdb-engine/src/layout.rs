use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ttdb_core::RecordId;

pub const DEFAULT_SEED: u64 = 0x7474_6462; // "ttdb"

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub iterations: usize,
    pub cooling: f64,
    pub seed: u64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 520.0,
            padding: 24.0,
            iterations: 60,
            cooling: 0.92,
            seed: DEFAULT_SEED,
        }
    }
}

// Fruchterman-Reingold for visible subgraphs without coordinates. Nodes
// keep their last computed position as the seed of the next run; unseen
// nodes draw a deterministic start from the fixed seed, so identical input
// reproduces identical layouts.
#[derive(Debug, Default)]
pub struct ForceLayout {
    positions: HashMap<RecordId, (f64, f64)>,
}

impl ForceLayout {
    pub fn positions(&self) -> &HashMap<RecordId, (f64, f64)> {
        &self.positions
    }

    pub fn run(
        &mut self,
        params: &LayoutParams,
        nodes: &[RecordId],
        edges: &[(RecordId, RecordId)],
    ) {
        let node_set: HashSet<&RecordId> = nodes.iter().collect();
        self.positions.retain(|id, _| node_set.contains(id));
        if nodes.is_empty() {
            return;
        }
        for id in nodes {
            if !self.positions.contains_key(id) {
                self.positions.insert(id.clone(), seed_position(params, id));
            }
        }

        let usable_w = (params.width - 2.0 * params.padding).max(1.0);
        let usable_h = (params.height - 2.0 * params.padding).max(1.0);
        let k = (usable_w * usable_h / nodes.len() as f64).sqrt();
        let mut temperature = params.width.min(params.height) / 4.0;

        let index: HashMap<&RecordId, usize> =
            nodes.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let mut pos: Vec<(f64, f64)> = nodes.iter().map(|id| self.positions[id]).collect();
        let edge_pairs: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(a, b)| {
                let ia = *index.get(a)?;
                let ib = *index.get(b)?;
                (ia != ib).then_some((ia, ib))
            })
            .collect();

        for _ in 0..params.iterations {
            let mut disp = vec![(0.0_f64, 0.0_f64); pos.len()];

            for i in 0..pos.len() {
                for j in (i + 1)..pos.len() {
                    let dx = pos[i].0 - pos[j].0;
                    let dy = pos[i].1 - pos[j].1;
                    let dist = dx.hypot(dy).max(0.01);
                    let force = k * k / dist;
                    let (ux, uy) = (dx / dist, dy / dist);
                    disp[i].0 += ux * force;
                    disp[i].1 += uy * force;
                    disp[j].0 -= ux * force;
                    disp[j].1 -= uy * force;
                }
            }

            for &(a, b) in &edge_pairs {
                let dx = pos[a].0 - pos[b].0;
                let dy = pos[a].1 - pos[b].1;
                let dist = dx.hypot(dy).max(0.01);
                let force = dist * dist / k;
                let (ux, uy) = (dx / dist, dy / dist);
                disp[a].0 -= ux * force;
                disp[a].1 -= uy * force;
                disp[b].0 += ux * force;
                disp[b].1 += uy * force;
            }

            for (point, d) in pos.iter_mut().zip(&disp) {
                let len = d.0.hypot(d.1);
                if len > 1e-9 {
                    let step = len.min(temperature);
                    point.0 += d.0 / len * step;
                    point.1 += d.1 / len * step;
                }
                point.0 = point.0.clamp(params.padding, params.width - params.padding);
                point.1 = point.1.clamp(params.padding, params.height - params.padding);
            }

            temperature *= params.cooling;
        }

        for (id, point) in nodes.iter().zip(pos) {
            self.positions.insert(id.clone(), point);
        }
    }
}

fn seed_position(params: &LayoutParams, id: &RecordId) -> (f64, f64) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(params.seed ^ hasher.finish());
    let usable_w = (params.width - 2.0 * params.padding).max(1.0);
    let usable_h = (params.height - 2.0 * params.padding).max(1.0);
    (
        params.padding + rng.gen_range(0.0..1.0) * usable_w,
        params.padding + rng.gen_range(0.0..1.0) * usable_h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<RecordId> {
        names.iter().map(|name| RecordId::new(*name)).collect()
    }

    fn chain_edges(nodes: &[RecordId]) -> Vec<(RecordId, RecordId)> {
        nodes
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }

    #[test]
    fn identical_input_reproduces_identical_positions() {
        let params = LayoutParams::default();
        let nodes = ids(&["@a", "@b", "@c", "@d"]);
        let edges = chain_edges(&nodes);

        let mut first = ForceLayout::default();
        first.run(&params, &nodes, &edges);
        let mut second = ForceLayout::default();
        second.run(&params, &nodes, &edges);

        assert_eq!(first.positions(), second.positions());
    }

    #[test]
    fn positions_stay_inside_the_padded_box() {
        let params = LayoutParams::default();
        let nodes = ids(&["@a", "@b", "@c", "@d", "@e", "@f"]);
        let mut layout = ForceLayout::default();
        layout.run(&params, &nodes, &chain_edges(&nodes));

        for (x, y) in layout.positions().values() {
            assert!(*x >= params.padding && *x <= params.width - params.padding);
            assert!(*y >= params.padding && *y <= params.height - params.padding);
        }
    }

    #[test]
    fn connected_nodes_sit_closer_than_disconnected_ones() {
        let params = LayoutParams::default();
        let nodes = ids(&["@a", "@b", "@c"]);
        let edges = vec![(nodes[0].clone(), nodes[1].clone())];
        let mut layout = ForceLayout::default();
        layout.run(&params, &nodes, &edges);

        let pos = layout.positions();
        let (ax, ay) = pos[&nodes[0]];
        let (bx, by) = pos[&nodes[1]];
        let (cx, cy) = pos[&nodes[2]];
        let linked = (ax - bx).hypot(ay - by);
        let unlinked = (ax - cx).hypot(ay - cy).min((bx - cx).hypot(by - cy));
        assert!(linked < unlinked);
    }

    #[test]
    fn repeated_runs_stay_deterministic() {
        let params = LayoutParams::default();
        let nodes = ids(&["@a", "@b", "@c"]);
        let edges = chain_edges(&nodes);

        let mut first = ForceLayout::default();
        first.run(&params, &nodes, &edges);
        first.run(&params, &nodes, &edges);

        let mut second = ForceLayout::default();
        second.run(&params, &nodes, &edges);
        second.run(&params, &nodes, &edges);

        assert_eq!(first.positions(), second.positions());
    }

    #[test]
    fn removed_nodes_are_dropped_and_edges_to_unknown_ids_ignored() {
        let params = LayoutParams::default();
        let nodes = ids(&["@a", "@b"]);
        let edges = vec![(nodes[0].clone(), RecordId::new("@missing"))];
        let mut layout = ForceLayout::default();
        layout.run(&params, &nodes, &edges);
        assert_eq!(layout.positions().len(), 2);

        layout.run(&params, &nodes[..1].to_vec(), &[]);
        assert_eq!(layout.positions().len(), 1);
        assert!(layout.positions().contains_key(&nodes[0]));
    }
}
