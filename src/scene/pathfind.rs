//! # 网格寻路
//!
//! 八方向 A*：直行代价 1，斜行代价 √2，启发函数为到终点的欧氏距离。
//! 起点本身不要求可通行（单位可能站在任何格子上），终点必须可通行。

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;

use crate::core::transform::tile_distance;

pub type TilePos = (i64, i64);

const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// 开放集条目：`f` 越小越先出堆
#[derive(Debug, Clone, Copy)]
struct Open {
    f: f64,
    idx: usize,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `width × height` 网格上从 `start` 到 `goal` 的最短路径，含首尾两格。
/// 越界、终点不可通行或不可达时返回 `None`。
pub fn find_path(
    width: u32,
    height: u32,
    start: TilePos,
    goal: TilePos,
    passable: impl Fn(TilePos) -> bool,
) -> Option<Vec<TilePos>> {
    let (w, h) = (i64::from(width), i64::from(height));
    let in_bounds = |t: TilePos| t.0 >= 0 && t.1 >= 0 && t.0 < w && t.1 < h;
    if !in_bounds(start) || !in_bounds(goal) || !passable(goal) {
        return None;
    }
    let index = |t: TilePos| (t.1 * w + t.0) as usize;
    let tile_at = |i: usize| ((i as i64) % w, (i as i64) / w);

    let n = (w * h) as usize;
    let mut g = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    let goal_idx = index(goal);
    g[index(start)] = 0.0;
    open.push(Open {
        f: tile_distance(start, goal),
        idx: index(start),
    });

    while let Some(Open { idx, .. }) = open.pop() {
        if idx == goal_idx {
            let mut path = vec![tile_at(idx)];
            let mut cur = idx;
            while let Some(prev) = parent[cur] {
                path.push(tile_at(prev));
                cur = prev;
            }
            path.reverse();
            return Some(path);
        }
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        let here = tile_at(idx);
        for (dx, dy) in NEIGHBORS {
            let next = (here.0 + dx, here.1 + dy);
            if !in_bounds(next) || !passable(next) {
                continue;
            }
            let ni = index(next);
            if closed[ni] {
                continue;
            }
            let step = if dx != 0 && dy != 0 { SQRT_2 } else { 1.0 };
            let cost = g[idx] + step;
            if cost < g[ni] {
                g[ni] = cost;
                parent[ni] = Some(idx);
                open.push(Open {
                    f: cost + tile_distance(next, goal),
                    idx: ni,
                });
            }
        }
    }
    None
}
