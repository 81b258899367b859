//! Plane/mode exchange (C2): the all-to-all transpose between a
//! plane-decomposed layout (each rank holds whole x-y planes for a
//! contiguous range of z/mode indices) and a mode-decomposed layout (each
//! rank holds a contiguous range of planes for every mode), grounded on
//! `original_source/src/message.cpp`'s `Message::exchange`.
//!
//! No MPI crate is in the dependency set (the pack carries none), so this
//! models the collective as an in-process permutation over `nproc`
//! logical ranks rather than a real network exchange — the data movement
//! and the involution property (`exchange(exchange(x)) == x`) are exactly
//! what the original implements, only the transport is simulated.
use crate::config::Geometry;
use crate::error::{io_error, DnsError};

/// Perform the plane <-> mode all-to-all transpose on data laid out as
/// `nproc` contiguous blocks of `block_len` `f64`s each (the real_t
/// overload of `Message::exchange`). `data` holds all ranks'
/// buffers concatenated, rank-major.
pub fn exchange(geom: &Geometry, data: &mut [f64], block_len: usize) -> Result<(), DnsError> {
    const ROUTINE: &str = "exchange";
    let nproc = geom.nproc();
    if data.len() != nproc * nproc * block_len {
        return Err(io_error(
            ROUTINE,
            format!(
                "buffer length {} does not match nproc^2 * block_len = {}",
                data.len(),
                nproc * nproc * block_len
            ),
        ));
    }
    if nproc == 1 {
        return Ok(());
    }

    // Each rank's buffer is itself divided into nproc sub-blocks, one
    // destined for each peer; swap sub-block (src, dst) with (dst, src)
    // across the whole rank-major buffer, i.e. a transpose of the
    // nproc x nproc grid of sub-blocks.
    let mut out = vec![0.0_f64; data.len()];
    for src in 0..nproc {
        for dst in 0..nproc {
            let from = (src * nproc + dst) * block_len;
            let to = (dst * nproc + src) * block_len;
            out[to..to + block_len].copy_from_slice(&data[from..from + block_len]);
        }
    }
    data.copy_from_slice(&out);
    Ok(())
}

/// `int_t` overload: same transpose, for the mode-index metadata that
/// rides alongside the real data.
pub fn exchange_i32(geom: &Geometry, data: &mut [i32], block_len: usize) -> Result<(), DnsError> {
    const ROUTINE: &str = "exchange_i32";
    let nproc = geom.nproc();
    if data.len() != nproc * nproc * block_len {
        return Err(io_error(ROUTINE, "buffer length mismatch"));
    }
    if nproc == 1 {
        return Ok(());
    }
    let mut out = vec![0_i32; data.len()];
    for src in 0..nproc {
        for dst in 0..nproc {
            let from = (src * nproc + dst) * block_len;
            let to = (dst * nproc + src) * block_len;
            out[to..to + block_len].copy_from_slice(&data[from..from + block_len]);
        }
    }
    data.copy_from_slice(&out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordSys;

    #[test]
    fn exchange_is_involutive() {
        let geom = Geometry::new(0, 4, 9, 8, 8, CoordSys::Cartesian).unwrap();
        let nproc = geom.nproc();
        let block_len = 3;
        let n = nproc * nproc * block_len;
        let original: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let mut data = original.clone();
        exchange(&geom, &mut data, block_len).unwrap();
        assert_ne!(data, original, "exchange should actually move data for nproc > 1");
        exchange(&geom, &mut data, block_len).unwrap();
        assert_eq!(data, original, "exchange must be its own inverse");
    }

    #[test]
    fn serial_is_noop() {
        let geom = Geometry::new(0, 1, 9, 8, 8, CoordSys::Cartesian).unwrap();
        let mut data = vec![1.0, 2.0, 3.0];
        let before = data.clone();
        exchange(&geom, &mut data, 3).unwrap();
        assert_eq!(data, before);
    }
}
