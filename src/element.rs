//! Spectral-element operators (§6.1): a narrow, consumed interface.
//!
//! spec.md scopes the full unstructured mesh/assembly-map machinery out
//! of this engine's core (the core works against one cross-sectional
//! operator, built once); this module supplies the one concrete instance
//! the rest of the crate needs, built from the Chebyshev collocation
//! operators in `bases` rather than a general-purpose mesh generator.
use crate::bases::{BaseBasics, LaplacianInverse};
use crate::Base;
use ndarray::Array2;

/// One reference element: a tensor-product Chebyshev patch in (x, y).
/// `nel == 1` degenerates to the teacher's single-domain case; `nel > 1`
/// is a naive side-by-side concatenation (no curved geometry, no
/// non-conforming edges) sufficient to exercise the assembly contract
/// without reimplementing a full mesh generator.
pub struct Element {
    pub id: usize,
    pub nx: usize,
    pub ny: usize,
}

impl Element {
    pub fn new(id: usize, nx: usize, ny: usize) -> Self {
        Element { id, nx, ny }
    }

    pub fn n_nodes(&self) -> usize {
        self.nx * self.ny
    }
}

/// Maps local (per-element) degrees of freedom to a global numbering,
/// merging coincident nodes on shared edges. One per field, since
/// different fields can have different essential-BC patterns (and thus
/// different numbers of globally-eliminated degrees of freedom).
pub struct AssemblyMap {
    /// `local_to_global[elem][local_node] = global_dof`.
    local_to_global: Vec<Vec<usize>>,
    n_global: usize,
}

impl AssemblyMap {
    /// Build the trivial (`nel == 1`) map: local numbering is global
    /// numbering.
    pub fn identity(element: &Element) -> Self {
        let n = element.n_nodes();
        AssemblyMap {
            local_to_global: vec![(0..n).collect()],
            n_global: n,
        }
    }

    /// Build a map over `nel` elements laid out in a 1-D strip along x,
    /// merging the shared edge between consecutive elements (the
    /// concatenation this module commits to instead of a general mesh).
    pub fn strip(elements: &[Element]) -> Self {
        let mut local_to_global = Vec::with_capacity(elements.len());
        let mut next_global = 0usize;
        let mut shared_edge: Option<Vec<usize>> = None;

        for elem in elements {
            let mut map = vec![0usize; elem.n_nodes()];
            for local in 0..elem.n_nodes() {
                let col = local / elem.ny;
                if col == 0 {
                    if let Some(edge) = &shared_edge {
                        map[local] = edge[local % elem.ny];
                        continue;
                    }
                }
                map[local] = next_global;
                next_global += 1;
            }
            shared_edge = Some(map[(elem.nx - 1) * elem.ny..].to_vec());
            local_to_global.push(map);
        }

        AssemblyMap { local_to_global, n_global: next_global }
    }

    pub fn global_dof(&self, elem: usize, local: usize) -> usize {
        self.local_to_global[elem][local]
    }

    pub fn n_global(&self) -> usize {
        self.n_global
    }

    /// Scatter local element contributions into a global vector,
    /// summing duplicate contributions on shared nodes (the "direct
    /// stiffness summation" every spectral-element assembly needs).
    pub fn scatter_add(&self, elem: usize, local_values: &[f64], global: &mut [f64]) {
        for (local, &val) in local_values.iter().enumerate() {
            global[self.local_to_global[elem][local]] += val;
        }
    }

    /// Gather a global vector's values back into one element's local
    /// ordering (the inverse half of assembly, used to broadcast a
    /// solved field back out to every element that shares a node).
    pub fn gather(&self, elem: usize, global: &[f64], local: &mut [f64]) {
        for (local_val, &g) in local.iter_mut().zip(self.local_to_global[elem].iter().map(|&g| &global[g])) {
            *local_val = g;
        }
    }
}

/// The reference-Laplacian operator an element contributes to the modal
/// matrix system, built from its Chebyshev bases.
pub fn reference_laplacian(bases: &[Base<f64>; 2]) -> Array2<f64> {
    let nx = bases[0].len_spec();
    let ny = bases[1].len_spec();
    let lx = bases[0].laplace();
    let ly = bases[1].laplace();
    let mut out = Array2::zeros((nx * ny, nx * ny));
    for i in 0..nx {
        for j in 0..ny {
            let row = i * ny + j;
            for jp in 0..ny {
                out[[row, i * ny + jp]] += ly[[j, jp]];
            }
            for ip in 0..nx {
                out[[row, ip * ny + j]] += lx[[i, ip]];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_is_bijective() {
        let elem = Element::new(0, 4, 4);
        let map = AssemblyMap::identity(&elem);
        assert_eq!(map.n_global(), 16);
        for local in 0..16 {
            assert_eq!(map.global_dof(0, local), local);
        }
    }

    #[test]
    fn strip_merges_shared_edge() {
        let elements = vec![Element::new(0, 3, 4), Element::new(1, 3, 4)];
        let map = AssemblyMap::strip(&elements);
        // Shared edge has 4 nodes, total nodes 24, merged -> 20 globals.
        assert_eq!(map.n_global(), 20);
    }
}
