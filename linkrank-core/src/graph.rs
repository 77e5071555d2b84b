use crate::index::VertexIndex;
use linkrank_ingest::LinkRecord;
use tracing::debug;

/// One cell of the adjacency matrix, used to report removed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

impl Edge {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// Dense V x V 0/1 adjacency over one group's vertex set. Row = source
/// vertex, column = target vertex. Self-loops are representable and get
/// no special handling.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Number of vertices (V).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, source: usize, target: usize) -> bool {
        self.cells[source * self.size + target] == 1
    }

    pub fn set(&mut self, source: usize, target: usize) {
        self.cells[source * self.size + target] = 1;
    }

    pub fn clear(&mut self, source: usize, target: usize) {
        self.cells[source * self.size + target] = 0;
    }

    /// Count of 1-entries in a row.
    pub fn out_degree(&self, source: usize) -> usize {
        let row = &self.cells[source * self.size..(source + 1) * self.size];
        row.iter().filter(|&&cell| cell == 1).count()
    }

    /// Total edge count across the matrix.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 1).count()
    }
}

/// Builds the group's adjacency matrix from its records. URLs absent
/// from the index (stale, so never admitted) are silently skipped. The
/// result may well contain cycles; nothing is checked here.
pub fn build_adjacency(records: &[LinkRecord], index: &VertexIndex) -> AdjacencyMatrix {
    let mut matrix = AdjacencyMatrix::new(index.len());
    for record in records {
        let Some(source) = index.index_of(&record.source_url) else {
            continue;
        };
        for target_url in &record.target_urls {
            if let Some(target) = index.index_of(target_url) {
                matrix.set(source, target);
            }
        }
    }
    debug!(
        "Adjacency: {} vertices, {} edges",
        matrix.size(),
        matrix.edge_count()
    );
    matrix
}
