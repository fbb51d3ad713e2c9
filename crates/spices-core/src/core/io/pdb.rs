use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::ids::ResidueId;
use crate::core::models::structure::{
    AssemblyOperation, BiologicalAssembly, Compound, DisulfideBond, ProteinStructure,
};
use nalgebra::{Matrix3, Point3, Vector3};
use phf::{Map, phf_map};
use std::io::{self, BufRead};
use thiserror::Error;

/// Nonstandard residue names mapped onto their standard residue.
pub static RESIDUE_ALIASES: Map<&'static str, &'static str> = phf_map! {
    // --- Selenomethionine ---
    "MSE" => "MET",

    // --- Histidine protonation states ---
    "HSD" => "HIS", "HSE" => "HIS", "HSP" => "HIS",
    "HID" => "HIS", "HIE" => "HIS", "HIP" => "HIS",

    // --- Force field variants ---
    "CYX" => "CYS", "CYM" => "CYS",
    "ASH" => "ASP", "GLH" => "GLU", "LYN" => "LYS",
};

/// Standard residue name for `name`, which may be an alias.
pub fn standard_residue_name(name: &str) -> &str {
    RESIDUE_ALIASES.get(name).copied().unwrap_or(name)
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Malformed BIOMT record")]
    InvalidBiomt,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn chain_name(line: &str, column: usize) -> String {
    match slice_and_trim(line, column, column + 1) {
        "" => "A".to_string(),
        id => id.to_string(),
    }
}

fn split_chain_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Collects the `REMARK 350` records into assemblies.
#[derive(Default)]
struct AssemblyReader {
    assemblies: Vec<BiologicalAssembly>,
    chains: Vec<String>,
    rows: Vec<[f64; 4]>,
}

impl AssemblyReader {
    fn read(&mut self, line: &str, line_num: usize) -> Result<(), PdbError> {
        let text = slice_and_trim(line, 11, 80);
        if let Some(number) = text.strip_prefix("BIOMOLECULE:") {
            let number = number.trim();
            let number = number.parse().map_err(|_| PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::InvalidInt {
                    columns: "24-80".into(),
                    value: number.into(),
                },
            })?;
            self.assemblies.push(BiologicalAssembly {
                number,
                operations: Vec::new(),
            });
            self.chains.clear();
            self.rows.clear();
        } else if let Some((_, list)) = text.split_once("APPLY THE FOLLOWING TO CHAINS:") {
            self.chains = split_chain_list(list).collect();
        } else if let Some((_, list)) = text.split_once("AND CHAINS:") {
            self.chains.extend(split_chain_list(list));
        } else if text.starts_with("BIOMT") {
            self.read_biomt(text, line_num)?;
        }
        Ok(())
    }

    fn read_biomt(&mut self, text: &str, line_num: usize) -> Result<(), PdbError> {
        let invalid = || PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidBiomt,
        };
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(invalid());
        }
        let operator: usize = fields[1].parse().map_err(|_| invalid())?;
        let mut row = [0.0; 4];
        for (value, field) in row.iter_mut().zip(&fields[2..6]) {
            *value = field.parse().map_err(|_| invalid())?;
        }
        self.rows.push(row);
        if fields[0] != "BIOMT3" {
            return Ok(());
        }
        if self.rows.len() != 3 {
            return Err(invalid());
        }
        let r = std::mem::take(&mut self.rows);
        let operation = AssemblyOperation {
            operator,
            chains: self.chains.clone(),
            rotation: Matrix3::new(
                r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
            ),
            translation: Vector3::new(r[0][3], r[1][3], r[2][3]),
        };
        self.assemblies
            .last_mut()
            .ok_or_else(invalid)?
            .operations
            .push(operation);
        Ok(())
    }
}

/// Parses the concatenated `COMPND` text into compounds.
fn parse_compounds(text: &str) -> Vec<Compound> {
    let mut compounds: Vec<Compound> = Vec::new();
    for token in text.split(';') {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_uppercase().as_str() {
            "MOL_ID" => compounds.push(Compound::default()),
            "MOLECULE" => {
                if let Some(compound) = compounds.last_mut() {
                    compound.molecule = value.to_string();
                }
            }
            "CHAIN" => {
                if let Some(compound) = compounds.last_mut() {
                    compound.chains = split_chain_list(value).collect();
                }
            }
            _ => {}
        }
    }
    compounds
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    /// Reads the first model of a PDB file.
    ///
    /// Water molecules are skipped. An atom whose name repeats within a residue
    /// (an alternate location) keeps its first occurrence.
    fn read_from(reader: &mut impl BufRead) -> Result<ProteinStructure, Self::Error> {
        let mut structure = ProteinStructure::new();
        let mut title_parts: Vec<String> = Vec::new();
        let mut compound_text = String::new();
        let mut assemblies = AssemblyReader::default();
        let mut model_count = 0usize;
        let mut first_model_done = false;
        let mut atom_count = 0usize;

        let mut current: Option<(String, isize, Option<char>, String, ResidueId)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "HEADER" => structure.set_id_code(slice_and_trim(&line, 62, 66)),
                "TITLE" => title_parts.push(slice_and_trim(&line, 10, 80).to_string()),
                "COMPND" => {
                    compound_text.push(' ');
                    compound_text.push_str(slice_and_trim(&line, 10, 80));
                }
                "SSBOND" => {
                    structure.add_disulfide_bond(DisulfideBond {
                        serial: parse_int(&line, line_num, 7, 10)?,
                        chain1: chain_name(&line, 15),
                        residue1: parse_int(&line, line_num, 17, 21)?,
                        chain2: chain_name(&line, 29),
                        residue2: parse_int(&line, line_num, 31, 35)?,
                    });
                }
                "REMARK" if slice_and_trim(&line, 6, 10) == "350" => {
                    assemblies.read(&line, line_num)?;
                }
                "MODEL" => model_count += 1,
                "ENDMDL" => first_model_done = true,
                "END" => break,
                "ATOM" | "HETATM" if !first_model_done => {
                    let pdb_name = slice_and_trim(&line, 17, 20);
                    if matches!(pdb_name, "HOH" | "WAT" | "DOD") {
                        continue;
                    }
                    let serial: usize = parse_int(&line, line_num, 6, 11)?;
                    let atom_name = slice_and_trim(&line, 12, 16);
                    let chain = chain_name(&line, 21);
                    let number: isize = parse_int(&line, line_num, 22, 26)?;
                    let insertion_code = line.get(26..27).and_then(|s| s.chars().next()).filter(|c| *c != ' ');
                    let position = Point3::new(
                        parse_float(&line, line_num, 30, 38)?,
                        parse_float(&line, line_num, 38, 46)?,
                        parse_float(&line, line_num, 46, 54)?,
                    );

                    let same_residue = current.as_ref().is_some_and(|(c, n, i, name, _)| {
                        *c == chain && *n == number && *i == insertion_code && name == pdb_name
                    });
                    if !same_residue {
                        let chain_id = structure.add_chain(&chain);
                        let residue_id = structure
                            .add_residue(
                                chain_id,
                                number,
                                insertion_code,
                                standard_residue_name(pdb_name),
                                pdb_name,
                            )
                            .ok_or_else(|| PdbError::MissingRecord(format!("chain {}", chain)))?;
                        current = Some((chain, number, insertion_code, pdb_name.to_string(), residue_id));
                    }
                    let Some((.., residue_id)) = current.as_ref() else {
                        continue;
                    };

                    let mut atom = Atom::new(serial, atom_name, *residue_id, position);
                    atom.element = slice_and_trim(&line, 76, 78).to_string();
                    if structure.add_atom(atom).is_some() {
                        atom_count += 1;
                    }
                }
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM".to_string()));
        }

        structure.set_title(&title_parts.join(" "));
        for compound in parse_compounds(&compound_text) {
            structure.add_compound(compound);
        }
        for assembly in assemblies.assemblies {
            structure.add_assembly(assembly);
        }
        structure.set_model_count(model_count.max(1));
        Ok(structure)
    }
}
