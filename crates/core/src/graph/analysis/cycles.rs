#![forbid(unsafe_code)]

use super::super::store::{BeatGraph, NodeIdx};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

#[derive(Clone, Copy)]
struct Frame {
    node: NodeIdx,
    last: Option<NodeIdx>,
}

impl BeatGraph {
    /// Enumerates cycles with an explicit-stack DFS.
    ///
    /// Every back edge onto the current path yields one cycle: the path slice
    /// from the revisited beat to the beat that points back at it.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let count = self.nodes.len();
        let mut marks = vec![Mark::Unvisited; count];
        let mut depth: Vec<usize> = vec![0; count];
        let mut frames: Vec<Frame> = Vec::new();
        let mut cycles = Vec::new();

        for root in 0..count {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::OnStack;
            depth[root] = 0;
            frames.push(Frame {
                node: root,
                last: None,
            });

            while let Some(&Frame { node, last }) = frames.last() {
                let Some(next) = self.next_dependent(node, last) else {
                    frames.pop();
                    marks[node] = Mark::Done;
                    continue;
                };
                if let Some(top) = frames.last_mut() {
                    top.last = Some(next);
                }

                match marks[next] {
                    Mark::OnStack => {
                        let path = frames[depth[next]..].iter().map(|frame| frame.node);
                        cycles.push(self.ids_of(path));
                    }
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        depth[next] = frames.len();
                        frames.push(Frame {
                            node: next,
                            last: None,
                        });
                    }
                    Mark::Done => {}
                }
            }
        }

        cycles
    }
}
