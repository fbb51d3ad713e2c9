use super::error::TopologyError;
use super::fragment::FragmentTree;
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use tracing::warn;

/// Separator between the residue fragments of a chain's SPICES.
pub const RESIDUE_SEPARATOR: &str = "\n-";

/// Backbone distance-force column of a coordinate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceIndex {
    /// Side chain particle, written as `0`.
    None,
    /// Backbone particle excluded from distance forces, written as `<0>`.
    Excluded,
    /// Backbone particle taking part in distance forces, written as `<n>`.
    Backbone(usize),
}

impl std::fmt::Display for ForceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForceIndex::None => write!(f, "0"),
            ForceIndex::Excluded => write!(f, "<0>"),
            ForceIndex::Backbone(index) => write!(f, "<{}>", index),
        }
    }
}

/// One particle line of the coordinate/connection table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    pub index: usize,
    pub particle: String,
    pub force_index: ForceIndex,
    pub position: Point3<f64>,
    pub connections: Vec<i64>,
}

impl CoordinateRecord {
    /// `index particle force x y z [offset]*`
    pub fn to_line(&self, decimals: usize) -> String {
        let mut line = format!(
            "{} {} {} {:.prec$} {:.prec$} {:.prec$}",
            self.index,
            self.particle,
            self.force_index,
            self.position.x,
            self.position.y,
            self.position.z,
            prec = decimals
        );
        for offset in &self.connections {
            let _ = write!(line, " {}", offset);
        }
        line
    }
}

/// Input of one active chain.
#[derive(Debug, Clone)]
pub struct ChainLayout<'a> {
    pub chain_id: &'a str,
    /// Chain SPICES with one residue fragment per line (`"\n-"` separated).
    pub spices: &'a str,
    /// Transformed backbone position of every residue.
    pub positions: &'a [Point3<f64>],
    /// Replacement particle for each residue's backbone particle.
    pub probes: &'a [Option<String>],
    /// Disulfide bond indices used in this chain; any other `[n]` marker is a
    /// chain-local ring closure.
    pub disulfide_bonds: &'a BTreeSet<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BondKey {
    Disulfide(u32),
    Ring(usize, u32),
}

/// Result of [`build_coordinate_table`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateTable {
    pub records: Vec<CoordinateRecord>,
    /// Last particle index written.
    pub last_index: usize,
    /// Last backbone force index assigned.
    pub last_backbone_index: usize,
}

impl CoordinateTable {
    pub fn lines(&self, decimals: usize) -> Vec<String> {
        self.records.iter().map(|r| r.to_line(decimals)).collect()
    }
}

/// Splits a chain's SPICES into residue fragment trees.
///
/// The first fragment is read back to front if it has no branch, which makes a
/// single particle residue the root instead of its N-terminal particle.
pub fn residue_trees(spices: &str) -> Result<Vec<FragmentTree>, TopologyError> {
    spices
        .split(RESIDUE_SEPARATOR)
        .enumerate()
        .map(|(i, fragment)| {
            if i == 0 && !fragment.contains('(') {
                FragmentTree::parse_reversed_linear(fragment)
            } else {
                FragmentTree::parse(fragment)
            }
        })
        .collect()
}

/// Builds the coordinate/connection table of the given chains.
///
/// Particles are numbered from `start_index`, in chain order and within each
/// residue in textual order. Every particle of a residue sits at the residue's
/// backbone position. Backbone particles with status `true` receive consecutive
/// force indices from `start_backbone_index`; excluded ones are written as
/// `<0>`. `status` holds one entry per residue over all chains.
///
/// Each line lists its connections as relative offsets: the previous residue's
/// backbone particle, the particle's parent, its children, the next residue's
/// backbone particle and finally its bond partner. A bond index that does not
/// occur exactly twice is skipped.
pub fn build_coordinate_table(
    chains: &[ChainLayout<'_>],
    start_index: usize,
    start_backbone_index: usize,
    status: &[bool],
) -> Result<CoordinateTable, TopologyError> {
    let mut records: Vec<CoordinateRecord> = Vec::new();
    let mut bonds: BTreeMap<BondKey, Vec<usize>> = BTreeMap::new();
    let mut backbone_ordinal = 0usize;
    let mut skipped = 0usize;

    for (chain_ordinal, chain) in chains.iter().enumerate() {
        let trees = residue_trees(chain.spices)?;
        if trees.len() != chain.positions.len() {
            return Err(TopologyError::ResidueCountMismatch {
                chain: chain.chain_id.to_string(),
                fragments: trees.len(),
                positions: chain.positions.len(),
            });
        }

        for (residue, tree) in trees.iter().enumerate() {
            let included = *status
                .get(backbone_ordinal)
                .ok_or(TopologyError::StatusOutOfRange {
                    index: backbone_ordinal + 1,
                })?;
            let position = chain.positions[residue];

            for (j, node) in tree.nodes().iter().enumerate() {
                let slot = records.len();
                for &marker in &node.markers {
                    let key = if chain.disulfide_bonds.contains(&marker) {
                        BondKey::Disulfide(marker)
                    } else {
                        BondKey::Ring(chain_ordinal, marker)
                    };
                    bonds.entry(key).or_default().push(slot);
                }

                let mut connections = Vec::new();
                let (particle, force_index) = if j == 0 {
                    if residue > 0 {
                        connections.push(-(trees[residue - 1].len() as i64));
                    }
                    let particle = chain
                        .probes
                        .get(residue)
                        .and_then(|probe| probe.clone())
                        .unwrap_or_else(|| node.name.clone());
                    let force_index = if included {
                        ForceIndex::Backbone(start_backbone_index + backbone_ordinal - skipped)
                    } else {
                        ForceIndex::Excluded
                    };
                    (particle, force_index)
                } else {
                    (node.name.clone(), ForceIndex::None)
                };
                connections.extend(tree.connection_offsets(j));
                if j == 0 && residue + 1 < trees.len() {
                    connections.push(tree.len() as i64);
                }

                records.push(CoordinateRecord {
                    index: start_index + slot,
                    particle,
                    force_index,
                    position,
                    connections,
                });
            }

            if !included {
                skipped += 1;
            }
            backbone_ordinal += 1;
        }
    }

    for (key, slots) in &bonds {
        if let [a, b] = slots.as_slice() {
            let (a, b) = (*a, *b);
            records[a].connections.push(b as i64 - a as i64);
            records[b].connections.push(a as i64 - b as i64);
        } else {
            warn!(
                "Bond {:?} has {} partner particles instead of 2; connection skipped.",
                key,
                slots.len()
            );
        }
    }

    let last_index = (start_index + records.len()).saturating_sub(1);
    let last_backbone_index = (start_backbone_index + backbone_ordinal - skipped).saturating_sub(1);
    Ok(CoordinateTable {
        records,
        last_index,
        last_backbone_index,
    })
}
