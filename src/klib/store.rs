use crate::klib::{KernelArgs, Randnum};
use ndarray::Array2;

/// All kernel state for one process (or one worker thread in the
/// parallel form). Points are immutable after generation; centroids
/// are overwritten in place during recomputation.
#[derive(Debug, Clone)]
pub struct ClusterStore {
    pub npoints: usize,
    pub dimension: usize,
    pub ncentroids: usize,
    pub mindistance: f32,
    /// npoints x dimension
    pub points: Array2<f32>,
    /// ncentroids x dimension
    pub centroids: Array2<f32>,
    /// point index -> cluster index
    pub map: Vec<usize>,
    /// cluster needs its mean recomputed
    pub dirty: Vec<bool>,
}

impl ClusterStore {
    /// Allocate the store and fill the points from the generator,
    /// one coordinate per draw, masked to 16 bits.
    pub fn generate(args: &KernelArgs, rng: &mut Randnum) -> Self {
        let cells = args
            .npoints
            .max(args.ncentroids)
            .checked_mul(args.dimension)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()));
        if cells.is_none() {
            error!("point store too large to allocate");
            std::process::exit(1);
        }

        // one draw per coordinate, in point order
        let coords: Vec<f32> = (0..args.npoints * args.dimension)
            .map(|_| (rng.next() & 0xffff) as f32)
            .collect();
        let points = Array2::from_shape_vec((args.npoints, args.dimension), coords)
            .expect("coordinate buffer matches its shape");

        Self {
            npoints: args.npoints,
            dimension: args.dimension,
            ncentroids: args.ncentroids,
            mindistance: args.mindistance,
            points,
            centroids: Array2::zeros((args.ncentroids, args.dimension)),
            map: vec![0; args.npoints],
            dirty: vec![false; args.ncentroids],
        }
    }

    /// Seed each centroid from a randomly drawn point and assign that
    /// point to the cluster; every point left unassigned afterwards
    /// gets a random cluster. Draws are with replacement: two clusters
    /// may seed from the same point and a later draw overwrites the
    /// earlier point's assignment.
    pub fn init_centroids(&mut self, rng: &mut Randnum) {
        if self.npoints == 0 || self.ncentroids == 0 {
            return;
        }

        let mut pending: Vec<Option<usize>> = vec![None; self.npoints];
        for c in 0..self.ncentroids {
            self.dirty[c] = true;
            let p = rng.next() as usize % self.npoints;
            self.centroids.row_mut(c).assign(&self.points.row(p));
            pending[p] = Some(c);
        }

        self.map = pending
            .into_iter()
            .map(|m| m.unwrap_or_else(|| rng.next() as usize % self.ncentroids))
            .collect();
    }

    /// A run is degenerate when there is nothing to assign or nothing
    /// to assign to; the clustering loop is skipped entirely.
    pub fn is_degenerate(&self) -> bool {
        self.npoints == 0 || self.ncentroids == 0
    }
}
