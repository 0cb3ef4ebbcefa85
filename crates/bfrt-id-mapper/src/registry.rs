//! Device unit to mapper registry.

use crate::config::IdMapperConfig;
use crate::error::{IdMapperError, IdMapperResult};
use crate::mapper::BfrtIdMapper;
use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Owns one [`BfrtIdMapper`] per attached device.
///
/// Mappers are handed out as `Arc`s, so a caller holding one keeps it alive
/// after the device is detached.
#[derive(Debug, Default)]
pub struct MapperRegistry {
    mappers: RwLock<HashMap<i32, Arc<BfrtIdMapper>>>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a mapper for `unit`.
    pub fn attach(&self, unit: i32) -> IdMapperResult<Arc<BfrtIdMapper>> {
        self.attach_with_config(unit, IdMapperConfig::default())
    }

    /// Creates and registers a mapper for `unit` with `config`.
    pub fn attach_with_config(
        &self,
        unit: i32,
        config: IdMapperConfig,
    ) -> IdMapperResult<Arc<BfrtIdMapper>> {
        let mut mappers = self.mappers.write();
        if mappers.contains_key(&unit) {
            return Err(IdMapperError::already_exists(format!(
                "ID mapper for device {}",
                unit
            )));
        }

        let mapper = Arc::new(BfrtIdMapper::create_instance_with_config(unit, config));
        mappers.insert(unit, Arc::clone(&mapper));
        info!("Attached ID mapper for device {}", unit);
        Ok(mapper)
    }

    /// Returns the mapper of `unit`.
    pub fn get(&self, unit: i32) -> IdMapperResult<Arc<BfrtIdMapper>> {
        self.mappers
            .read()
            .get(&unit)
            .cloned()
            .ok_or_else(|| IdMapperError::not_found(format!("ID mapper for device {}", unit)))
    }

    /// Unregisters and returns the mapper of `unit`.
    pub fn detach(&self, unit: i32) -> IdMapperResult<Arc<BfrtIdMapper>> {
        let mapper = self
            .mappers
            .write()
            .remove(&unit)
            .ok_or_else(|| IdMapperError::not_found(format!("ID mapper for device {}", unit)))?;
        info!("Detached ID mapper for device {}", unit);
        Ok(mapper)
    }

    /// Attached units in ascending order.
    pub fn units(&self) -> Vec<i32> {
        let mut units: Vec<i32> = self.mappers.read().keys().copied().collect();
        units.sort_unstable();
        units
    }

    pub fn len(&self) -> usize {
        self.mappers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.read().is_empty()
    }
}
