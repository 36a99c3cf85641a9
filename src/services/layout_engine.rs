use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{Cascade, LayoutSettings, Pattern, Point, Size};

/// Position of every pattern's node center, keyed by pattern id.
pub type PositionMap = HashMap<Uuid, Point>;

/// Lays patterns out left-to-right by cascade depth.
///
/// Column 0 holds every pattern that is never the target of a cascade; each
/// following column holds the not-yet-placed targets of the previous column.
/// Whatever the chain never reaches (cycles, disconnected patterns) is merged
/// into one final column. Pure: the same inputs always give the same map.
pub fn compute_layout(
    patterns: &[Pattern],
    cascades: &[Cascade],
    canvas: Size,
    settings: &LayoutSettings,
) -> PositionMap {
    let mut positions = PositionMap::new();
    if patterns.is_empty() {
        return positions;
    }

    let columns = assign_columns(patterns, cascades);

    let column_count = columns.len() as f64;
    let total_width = column_count * settings.node_width + (column_count - 1.0) * settings.horizontal_spacing;
    let start_x = ((canvas.width - total_width) / 2.0).max(settings.margin);

    for (col_idx, column) in columns.iter().enumerate() {
        let x = start_x + col_idx as f64 * (settings.node_width + settings.horizontal_spacing) + settings.node_width / 2.0;

        let row_count = column.len() as f64;
        let total_height = row_count * settings.node_height + (row_count - 1.0) * settings.vertical_spacing;
        let start_y = ((canvas.height - total_height) / 2.0).max(settings.margin);

        for (row_idx, id) in column.iter().enumerate() {
            let y = start_y + row_idx as f64 * (settings.node_height + settings.vertical_spacing) + settings.node_height / 2.0;
            positions.insert(*id, Point::new(x, y));
        }
    }

    log::debug!(
        "[LayoutEngine] placed {} patterns in {} columns",
        positions.len(),
        columns.len()
    );

    positions
}

/// Splits patterns into columns of ids, each column in timestamp order.
/// Every distinct pattern id lands in exactly one column.
pub fn assign_columns(patterns: &[Pattern], cascades: &[Cascade]) -> Vec<Vec<Uuid>> {
    let sorted = sorted_unique(patterns);
    if sorted.is_empty() {
        return Vec::new();
    }

    let known: HashSet<Uuid> = sorted.iter().map(|p| p.id).collect();

    // Only cascades with both endpoints present take part; the rest are ignored.
    let mut successors: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    let mut targets: HashSet<Uuid> = HashSet::new();
    for (from, to) in cascades.iter().filter_map(Cascade::endpoints) {
        if known.contains(&from) && known.contains(&to) {
            successors.entry(from).or_default().insert(to);
            targets.insert(to);
        }
    }

    let mut columns: Vec<Vec<Uuid>> = Vec::new();
    let mut assigned: HashSet<Uuid> = HashSet::new();

    let roots: Vec<Uuid> = sorted
        .iter()
        .map(|p| p.id)
        .filter(|id| !targets.contains(id))
        .collect();

    if !roots.is_empty() {
        assigned.extend(roots.iter().copied());
        columns.push(roots);

        loop {
            let current = &columns[columns.len() - 1];
            let next: Vec<Uuid> = sorted
                .iter()
                .map(|p| p.id)
                .filter(|id| !assigned.contains(id))
                .filter(|id| {
                    current
                        .iter()
                        .any(|src| successors.get(src).is_some_and(|s| s.contains(id)))
                })
                .collect();

            if next.is_empty() {
                break;
            }
            assigned.extend(next.iter().copied());
            columns.push(next);
        }
    }

    let remaining: Vec<Uuid> = sorted
        .iter()
        .map(|p| p.id)
        .filter(|id| !assigned.contains(id))
        .collect();
    if !remaining.is_empty() {
        log::debug!(
            "[LayoutEngine] {} patterns unreachable from roots, merged into final column",
            remaining.len()
        );
        assigned.extend(remaining.iter().copied());
        columns.push(remaining);
    }

    if columns.is_empty() {
        columns.push(sorted.iter().map(|p| p.id).collect());
    }

    columns
}

/// Timestamp order, ties kept in input order; repeated ids keep their first occurrence.
fn sorted_unique(patterns: &[Pattern]) -> Vec<&Pattern> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&Pattern> = patterns.iter().filter(|p| seen.insert(p.id)).collect();
    unique.sort_by_key(|p| p.timestamp);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternCategory;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn pattern_at(name: &str, minutes: i64) -> Pattern {
        let base = Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0).unwrap();
        Pattern::new(name, PatternCategory::Sensory, 5, base + Duration::minutes(minutes))
    }

    fn canvas() -> Size {
        Size::new(800.0, 600.0)
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let positions = compute_layout(&[], &[], canvas(), &LayoutSettings::default());
        assert!(positions.is_empty());
    }

    #[test]
    fn chain_builds_one_column_per_depth() {
        let a = pattern_at("Noise", 0);
        let b = pattern_at("Overwhelm", 10);
        let c = pattern_at("Shutdown", 20);
        let cascades = vec![Cascade::new(a.id, b.id, 0.8), Cascade::new(b.id, c.id, 0.6)];

        let columns = assign_columns(&[c.clone(), a.clone(), b.clone()], &cascades);
        assert_eq!(columns, vec![vec![a.id], vec![b.id], vec![c.id]]);

        let positions = compute_layout(&[a.clone(), b.clone(), c.clone()], &cascades, canvas(), &LayoutSettings::default());
        assert!(positions[&a.id].x < positions[&b.id].x);
        assert!(positions[&b.id].x < positions[&c.id].x);
    }

    #[test]
    fn roots_are_ordered_by_timestamp() {
        let late = pattern_at("Late", 30);
        let early = pattern_at("Early", 5);
        let columns = assign_columns(&[late.clone(), early.clone()], &[]);
        assert_eq!(columns, vec![vec![early.id, late.id]]);
    }

    #[test]
    fn two_cycle_terminates_and_places_everything() {
        let a = pattern_at("A", 0);
        let b = pattern_at("B", 1);
        let c = pattern_at("C", 2);
        let cascades = vec![Cascade::new(a.id, b.id, 0.5), Cascade::new(b.id, a.id, 0.5)];

        let patterns = vec![a.clone(), b.clone(), c.clone()];
        let positions = compute_layout(&patterns, &cascades, canvas(), &LayoutSettings::default());
        assert_eq!(positions.len(), 3);

        // C is the only root; the cycle members share the fallback column.
        let columns = assign_columns(&patterns, &cascades);
        assert_eq!(columns, vec![vec![c.id], vec![a.id, b.id]]);
    }

    #[test]
    fn full_cycle_falls_back_to_single_column() {
        let a = pattern_at("A", 0);
        let b = pattern_at("B", 1);
        let cascades = vec![Cascade::new(a.id, b.id, 0.5), Cascade::new(b.id, a.id, 0.5)];
        let columns = assign_columns(&[a.clone(), b.clone()], &cascades);
        assert_eq!(columns, vec![vec![a.id, b.id]]);
    }

    #[test]
    fn self_loop_is_not_an_error() {
        let a = pattern_at("A", 0);
        let cascades = vec![Cascade::new(a.id, a.id, 1.0)];
        let positions = compute_layout(&[a.clone()], &cascades, canvas(), &LayoutSettings::default());
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn dangling_cascade_changes_nothing() {
        let a = pattern_at("A", 0);
        let b = pattern_at("B", 1);
        let patterns = vec![a.clone(), b.clone()];
        let clean = vec![Cascade::new(a.id, b.id, 0.9)];
        let mut dirty = clean.clone();
        dirty.push(Cascade::new(Uuid::new_v4(), b.id, 0.4));
        dirty.push(Cascade::new(a.id, Uuid::new_v4(), 0.4));
        dirty.push(Cascade {
            id: Uuid::new_v4(),
            from_pattern: None,
            to_pattern: Some(a.id),
            confidence: 0.2,
        });

        let settings = LayoutSettings::default();
        assert_eq!(
            compute_layout(&patterns, &clean, canvas(), &settings),
            compute_layout(&patterns, &dirty, canvas(), &settings)
        );
    }

    #[test]
    fn duplicate_ids_are_placed_once() {
        let a = pattern_at("A", 0);
        let positions = compute_layout(&[a.clone(), a.clone()], &[], canvas(), &LayoutSettings::default());
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn wide_layout_clamps_to_margin() {
        let settings = LayoutSettings::default();
        let mut patterns = Vec::new();
        let mut cascades = Vec::new();
        for i in 0..10 {
            patterns.push(pattern_at(&format!("P{}", i), i));
            if i > 0 {
                cascades.push(Cascade::new(patterns[i as usize - 1].id, patterns[i as usize].id, 0.5));
            }
        }
        let positions = compute_layout(&patterns, &cascades, canvas(), &settings);
        let first = positions[&patterns[0].id];
        assert_eq!(first.x, settings.margin + settings.node_width / 2.0);
    }

    #[test]
    fn single_node_is_centered() {
        let a = pattern_at("A", 0);
        let positions = compute_layout(&[a.clone()], &[], canvas(), &LayoutSettings::default());
        assert_eq!(positions[&a.id], Point::new(400.0, 300.0));
    }

    fn arb_graph() -> impl Strategy<Value = (Vec<Pattern>, Vec<Cascade>)> {
        (1usize..24).prop_flat_map(|n| {
            let minutes = proptest::collection::vec(0i64..120, n);
            let edges = proptest::collection::vec((0..n + 2, 0..n + 2, 0.0f32..=1.0), 0..n * 2);
            (minutes, edges).prop_map(move |(minutes, edges)| {
                let patterns: Vec<Pattern> = minutes
                    .iter()
                    .enumerate()
                    .map(|(i, m)| pattern_at(&format!("P{}", i), *m))
                    .collect();
                // Indices past the end become dangling references.
                let id_at = |i: usize| patterns.get(i).map(|p| p.id).unwrap_or_else(Uuid::new_v4);
                let cascades: Vec<Cascade> = edges
                    .into_iter()
                    .map(|(f, t, c)| Cascade::new(id_at(f), id_at(t), c))
                    .collect();
                (patterns, cascades)
            })
        })
    }

    proptest! {
        #[test]
        fn layout_is_deterministic((patterns, cascades) in arb_graph()) {
            let settings = LayoutSettings::default();
            let first = compute_layout(&patterns, &cascades, canvas(), &settings);
            let second = compute_layout(&patterns, &cascades, canvas(), &settings);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn every_pattern_placed_exactly_once((patterns, cascades) in arb_graph()) {
            let positions = compute_layout(&patterns, &cascades, canvas(), &LayoutSettings::default());
            prop_assert_eq!(positions.len(), patterns.len());
            for p in &patterns {
                prop_assert!(positions.contains_key(&p.id));
            }

            let columns = assign_columns(&patterns, &cascades);
            let flat: Vec<Uuid> = columns.into_iter().flatten().collect();
            let distinct: HashSet<Uuid> = flat.iter().copied().collect();
            prop_assert_eq!(flat.len(), distinct.len());
        }

        #[test]
        fn column_members_never_overlap((patterns, cascades) in arb_graph()) {
            let settings = LayoutSettings::default();
            let positions = compute_layout(&patterns, &cascades, canvas(), &settings);
            for column in assign_columns(&patterns, &cascades) {
                for (i, a) in column.iter().enumerate() {
                    for b in column.iter().skip(i + 1) {
                        let gap = (positions[a].y - positions[b].y).abs();
                        prop_assert!(gap >= settings.node_height + settings.vertical_spacing - 1e-9);
                    }
                }
            }
        }

        #[test]
        fn dangling_edges_do_not_move_nodes((patterns, cascades) in arb_graph()) {
            let settings = LayoutSettings::default();
            let ids: HashSet<Uuid> = patterns.iter().map(|p| p.id).collect();
            let resolved: Vec<Cascade> = cascades
                .iter()
                .filter(|c| c.endpoints().is_some_and(|(f, t)| ids.contains(&f) && ids.contains(&t)))
                .cloned()
                .collect();
            prop_assert_eq!(
                compute_layout(&patterns, &cascades, canvas(), &settings),
                compute_layout(&patterns, &resolved, canvas(), &settings)
            );
        }
    }
}
