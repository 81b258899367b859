//! Persisted field dump format (§6.4): ten 80-byte ASCII header lines
//! followed by the raw IEEE-754 double body, one plane at a time. Not
//! HDF5 (the teacher crate's own field I/O uses an `hdf5-interface`
//! dependency we drop here, see DESIGN.md) — hand-rolled
//! `to_le_bytes`/`from_le_bytes` encoding, grounded on the manual binary
//! header parsing in `other_examples/`'s Bruker-format reader, since this
//! wire format isn't one `serde` (or any crate in the pack) can drive
//! generically.
use crate::error::{io_error, DnsError};

const HEADER_LINES: usize = 10;
const LINE_LEN: usize = 80;

/// Byte order the body was written in; the header records which, so a
/// dump produced on a big-endian machine still reads correctly elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// One field dump: header metadata plus however many named field
/// components (`u`, `v`, `w`, `p`, `c`, ...) it carries, each a flat
/// `nz * n_plane`-length array of doubles.
#[derive(Debug, Clone)]
pub struct FieldDump {
    pub session_name: String,
    pub step: usize,
    pub time: f64,
    pub np: usize,
    pub nz: usize,
    pub nel: usize,
    pub endian: Endian,
    pub fields: Vec<(char, Vec<f64>)>,
}

fn pad80(s: &str) -> [u8; LINE_LEN] {
    let mut line = [b' '; LINE_LEN];
    let bytes = s.as_bytes();
    let n = bytes.len().min(LINE_LEN);
    line[..n].copy_from_slice(&bytes[..n]);
    line
}

impl FieldDump {
    /// Serialise into the ten-line-header + body layout.
    pub fn write(&self) -> Vec<u8> {
        let field_names: String = self.fields.iter().map(|(c, _)| *c).collect();
        let lines = [
            format!("{:<80}", self.session_name),
            format!("{:<80}", format!("Step {}", self.step)),
            format!("{:<80}", format!("Time {:.10e}", self.time)),
            format!("{:<80}", format!("Np {}", self.np)),
            format!("{:<80}", format!("Nz {}", self.nz)),
            format!("{:<80}", format!("Nel {}", self.nel)),
            format!("{:<80}", format!("Fields {field_names}")),
            format!("{:<80}", match self.endian {
                Endian::Little => "Endian little",
                Endian::Big => "Endian big",
            }),
            format!("{:<80}", ""),
            format!("{:<80}", "ENDIAN-IEEE-754-DOUBLE"),
        ];

        let mut out = Vec::with_capacity(HEADER_LINES * LINE_LEN + self.body_len());
        for line in &lines {
            out.extend_from_slice(&pad80(line));
        }
        for (_, data) in &self.fields {
            for &v in data {
                let bytes = match self.endian {
                    Endian::Little => v.to_le_bytes(),
                    Endian::Big => v.to_be_bytes(),
                };
                out.extend_from_slice(&bytes);
            }
        }
        out
    }

    fn body_len(&self) -> usize {
        self.fields.iter().map(|(_, d)| d.len() * 8).sum()
    }

    /// Parse a dump previously produced by [`FieldDump::write`].
    pub fn read(bytes: &[u8]) -> Result<Self, DnsError> {
        const ROUTINE: &str = "FieldDump::read";
        if bytes.len() < HEADER_LINES * LINE_LEN {
            return Err(io_error(ROUTINE, "truncated header"));
        }
        let mut lines = Vec::with_capacity(HEADER_LINES);
        for i in 0..HEADER_LINES {
            let chunk = &bytes[i * LINE_LEN..(i + 1) * LINE_LEN];
            lines.push(String::from_utf8_lossy(chunk).trim_end().to_string());
        }

        let session_name = lines[0].clone();
        let step = parse_field(&lines[1], "Step", ROUTINE)?;
        let time = parse_field(&lines[2], "Time", ROUTINE)?;
        let np = parse_field(&lines[3], "Np", ROUTINE)?;
        let nz = parse_field(&lines[4], "Nz", ROUTINE)?;
        let nel = parse_field(&lines[5], "Nel", ROUTINE)?;
        let field_names: Vec<char> = lines[6]
            .trim_start_matches("Fields")
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let endian = if lines[7].contains("big") { Endian::Big } else { Endian::Little };

        let n_plane = np * np * nel;
        let n_per_field = n_plane * nz;
        let body = &bytes[HEADER_LINES * LINE_LEN..];
        let expected = field_names.len() * n_per_field * 8;
        if body.len() < expected {
            return Err(io_error(ROUTINE, format!("truncated body: expected {expected} bytes, got {}", body.len())));
        }

        let mut fields = Vec::with_capacity(field_names.len());
        for (fi, &name) in field_names.iter().enumerate() {
            let mut data = Vec::with_capacity(n_per_field);
            let base = fi * n_per_field * 8;
            for j in 0..n_per_field {
                let off = base + j * 8;
                let raw: [u8; 8] = body[off..off + 8].try_into().unwrap();
                data.push(match endian {
                    Endian::Little => f64::from_le_bytes(raw),
                    Endian::Big => f64::from_be_bytes(raw),
                });
            }
            fields.push((name, data));
        }

        Ok(FieldDump { session_name, step, time, np, nz, nel, endian, fields })
    }
}

fn parse_field<T: std::str::FromStr>(line: &str, key: &str, routine: &'static str) -> Result<T, DnsError> {
    line.trim_start_matches(key)
        .trim()
        .parse()
        .map_err(|_| io_error(routine, format!("malformed '{key}' header line: '{line}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let dump = FieldDump {
            session_name: "test".into(),
            step: 42,
            time: 1.5,
            np: 3,
            nz: 2,
            nel: 1,
            endian: Endian::Little,
            fields: vec![('u', vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0])],
        };
        let bytes = dump.write();
        let back = FieldDump::read(&bytes).unwrap();
        assert_eq!(back.step, 42);
        assert_eq!(back.fields[0].0, 'u');
        assert_eq!(back.fields[0].1, dump.fields[0].1);
    }

    #[test]
    fn rejects_truncated_body() {
        let dump = FieldDump {
            session_name: "t".into(),
            step: 0,
            time: 0.0,
            np: 2,
            nz: 1,
            nel: 1,
            endian: Endian::Little,
            fields: vec![('u', vec![0.0; 4])],
        };
        let mut bytes = dump.write();
        bytes.truncate(bytes.len() - 4);
        assert!(FieldDump::read(&bytes).is_err());
    }
}
