use super::error::EngineError;
use super::mapper::PdbToDpd;
use super::masterdata::Masterdata;
use crate::core::catalog::registry::AminoAcidCatalog;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Reusable mappers keyed by the serialized masterdata they were built from.
///
/// A checked out mapper is removed from the pool, so two callers never share
/// one. Releasing puts it back unless an equal mapper is already pooled.
#[derive(Debug)]
pub struct MapperPool {
    catalog: Arc<AminoAcidCatalog>,
    mappers: Mutex<HashMap<String, PdbToDpd>>,
}

impl MapperPool {
    pub fn new(catalog: Arc<AminoAcidCatalog>) -> Self {
        Self {
            catalog,
            mappers: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<AminoAcidCatalog> {
        &self.catalog
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, PdbToDpd>> {
        self.mappers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Takes the mapper for `masterdata` out of the pool, building it when none
    /// is pooled. Empty masterdata yields `None`.
    pub fn checkout(&self, masterdata: &Masterdata) -> Result<Option<PdbToDpd>, EngineError> {
        if masterdata.is_empty() {
            return Ok(None);
        }
        let key = masterdata.to_toml()?;
        if let Some(mapper) = self.lock().remove(&key) {
            debug!("Reusing pooled mapper.");
            return Ok(Some(mapper));
        }
        debug!("Building new mapper from masterdata.");
        PdbToDpd::from_masterdata(masterdata.clone(), self.catalog.clone()).map(Some)
    }

    /// Returns a mapper to the pool under its current masterdata.
    pub fn release(&self, mapper: PdbToDpd) -> Result<(), EngineError> {
        let key = mapper.masterdata().to_toml()?;
        self.lock().entry(key).or_insert(mapper);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::masterdata::keys;
    use std::thread;

    const PDB: &str = "\
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  ALA A   2       3.800   0.000   0.000  1.00  0.00           C
END
";

    fn pool() -> MapperPool {
        MapperPool::new(Arc::new(AminoAcidCatalog::builtin().unwrap()))
    }

    fn masterdata(pool: &MapperPool) -> Masterdata {
        PdbToDpd::from_pdb(PDB, pool.catalog().clone())
            .unwrap()
            .masterdata()
            .clone()
    }

    #[test]
    fn empty_masterdata_checks_out_nothing() {
        let pool = pool();
        assert!(pool.checkout(&Masterdata::new()).unwrap().is_none());
    }

    #[test]
    fn released_mapper_is_reused_and_removed() {
        let pool = pool();
        let masterdata = masterdata(&pool);
        let mapper = pool.checkout(&masterdata).unwrap().unwrap();
        assert!(pool.is_empty());

        pool.release(mapper).unwrap();
        assert_eq!(pool.len(), 1);
        let mapper = pool.checkout(&masterdata).unwrap().unwrap();
        assert!(pool.is_empty());
        assert_eq!(mapper.spices().unwrap(), "Nt-Gly\n-Ala-Ct\n");
    }

    #[test]
    fn release_keeps_the_first_of_equal_mappers() {
        let pool = pool();
        let masterdata = masterdata(&pool);
        let first = pool.checkout(&masterdata).unwrap().unwrap();
        let second = pool.checkout(&masterdata).unwrap().unwrap();
        pool.release(first).unwrap();
        pool.release(second).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn changed_mapper_is_pooled_under_its_new_state() {
        let pool = pool();
        let masterdata = masterdata(&pool);
        let mut mapper = pool.checkout(&masterdata).unwrap().unwrap();
        mapper.set_ph(7.0);
        let changed = mapper.masterdata().clone();
        pool.release(mapper).unwrap();

        let mapper = pool.checkout(&changed).unwrap().unwrap();
        assert_eq!(mapper.masterdata().get(keys::PH_VALUE), Some("7"));
        assert!(pool.is_empty());
    }

    #[test]
    fn threads_never_share_a_mapper() {
        let pool = Arc::new(pool());
        let masterdata = masterdata(&pool);
        pool.release(PdbToDpd::from_masterdata(masterdata.clone(), pool.catalog().clone()).unwrap())
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let masterdata = masterdata.clone();
                thread::spawn(move || {
                    let mapper = pool.checkout(&masterdata).unwrap().unwrap();
                    let spices = mapper.spices().unwrap();
                    pool.release(mapper).unwrap();
                    spices
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Nt-Gly\n-Ala-Ct\n");
        }
        assert_eq!(pool.len(), 1);

        pool.clear();
        assert!(pool.is_empty());
    }
}
