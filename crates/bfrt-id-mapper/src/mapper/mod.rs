//! Per-device P4Info <-> BfRt ID mapper.
//!
//! A [`BfrtIdMapper`] owns one set of mapping tables behind a single
//! reader-writer lock. Pushes take the lock exclusively for the whole table
//! rebuild; lookups take it shared. Name resolution against the pushed
//! artifacts runs before the exclusive section, so readers keep seeing the
//! previous generation while a push is being prepared.
//!
//! A failed push leaves the tables partially rebuilt and the mapper stale
//! (see [`BfrtIdMapper::is_stale`]) until a later push succeeds; there is
//! no rollback to the previous generation.

mod indirection;
mod tables;
mod translator;

pub use tables::MappingSnapshot;

use crate::config::IdMapperConfig;
use crate::descriptor::{ContextJsonParser, IndirectionParser};
use crate::error::{IdMapperError, IdMapperResult};
use bfrt::{BfRtId, DriverMetadata};
use indirection::IndirectionIndexes;
use log::{info, warn};
use p4rt_types::{DeviceTarget, P4Info, P4InfoId};
use parking_lot::RwLock;
use std::fmt;
use tables::MappingTables;
use translator::PrimaryJoin;

/// Bidirectional ID mapper for one device.
///
/// Instances are only obtained through [`BfrtIdMapper::create_instance`]
/// and its variants, each bound to a device unit.
pub struct BfrtIdMapper {
    unit: i32,
    config: IdMapperConfig,
    parser: Box<dyn IndirectionParser>,
    tables: RwLock<MappingTables>,
}

impl fmt::Debug for BfrtIdMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("BfrtIdMapper")
            .field("unit", &self.unit)
            .field("config", &self.config)
            .field("generation", &tables.generation)
            .field("stale", &tables.stale)
            .field("ids", &tables.ids.len())
            .finish()
    }
}

impl BfrtIdMapper {
    /// Creates a mapper for `unit` with the default configuration.
    pub fn create_instance(unit: i32) -> Self {
        Self::create_instance_with_config(unit, IdMapperConfig::default())
    }

    /// Creates a mapper for `unit`.
    pub fn create_instance_with_config(unit: i32, config: IdMapperConfig) -> Self {
        Self::create_instance_with_parser(unit, config, Box::new(ContextJsonParser::new()))
    }

    /// Creates a mapper for `unit` that reads indirection descriptors with
    /// `parser`.
    pub fn create_instance_with_parser(
        unit: i32,
        config: IdMapperConfig,
        parser: Box<dyn IndirectionParser>,
    ) -> Self {
        Self {
            unit,
            config,
            parser,
            tables: RwLock::new(MappingTables::default()),
        }
    }

    /// Device unit this mapper is bound to.
    pub fn unit(&self) -> i32 {
        self.unit
    }

    pub fn config(&self) -> &IdMapperConfig {
        &self.config
    }

    /// Rebuilds the primary mapping from a pipeline's P4Info and driver
    /// metadata.
    ///
    /// Objects present on only one side are skipped. Indirection mappings
    /// of the previous pipeline are dropped; rebuild them with
    /// [`build_action_profile_mapping`](Self::build_action_profile_mapping).
    pub fn push_pipeline_info(
        &self,
        p4info: &P4Info,
        driver: &dyn DriverMetadata,
    ) -> IdMapperResult<()> {
        let join = self.prepare(p4info, driver)?;

        let mut tables = self.tables.write();
        tables.begin_rebuild();
        if let Err(e) = translator::fill_ids(&mut tables.ids, &join.joined) {
            warn!("Device {}: pipeline push failed: {}", self.unit, e);
            return Err(e);
        }
        tables.commit();
        let generation = tables.generation;
        drop(tables);

        self.log_push_summary(p4info, &join, generation);
        Ok(())
    }

    /// Rebuilds the action profile <-> selector mapping from an
    /// indirection descriptor.
    ///
    /// Must follow a successful [`push_pipeline_info`](Self::push_pipeline_info)
    /// for the same pipeline. Descriptor problems are not errors: entries
    /// that cannot be resolved are logged and skipped.
    pub fn build_action_profile_mapping(
        &self,
        p4info: &P4Info,
        driver: &dyn DriverMetadata,
        descriptor: &str,
    ) -> IdMapperResult<()> {
        let refs = self.parser.parse(descriptor);
        let indexes = IndirectionIndexes::build(p4info, driver, &self.config)?;

        let mut tables = self.tables.write();
        if tables.generation == 0 {
            warn!(
                "Device {}: no pipeline pushed, ignoring indirection descriptor",
                self.unit
            );
            return Ok(());
        }

        let MappingTables {
            ids,
            profile_selector,
            ..
        } = &mut *tables;
        profile_selector.clear();
        let recorded = indirection::associate(&refs, ids, &indexes, profile_selector);
        drop(tables);

        info!(
            "Device {}: {} action profile/selector pairs from {} descriptor entries",
            self.unit,
            recorded,
            refs.len()
        );
        Ok(())
    }

    /// Rebuilds the primary and indirection mappings under one exclusive
    /// section, so readers never see one without the other.
    pub fn push_forwarding_pipeline(
        &self,
        p4info: &P4Info,
        driver: &dyn DriverMetadata,
        descriptor: Option<&str>,
    ) -> IdMapperResult<()> {
        let join = self.prepare(p4info, driver)?;
        let refs = descriptor
            .map(|text| self.parser.parse(text))
            .unwrap_or_default();
        let indexes = if refs.is_empty() {
            IndirectionIndexes::default()
        } else {
            self.prepare_indexes(p4info, driver)?
        };

        let mut tables = self.tables.write();
        tables.begin_rebuild();
        if let Err(e) = translator::fill_ids(&mut tables.ids, &join.joined) {
            warn!("Device {}: pipeline push failed: {}", self.unit, e);
            return Err(e);
        }

        let MappingTables {
            ids,
            profile_selector,
            ..
        } = &mut *tables;
        let recorded = indirection::associate(&refs, ids, &indexes, profile_selector);
        tables.commit();
        let generation = tables.generation;
        drop(tables);

        self.log_push_summary(p4info, &join, generation);
        if descriptor.is_some() {
            info!(
                "Device {}: {} action profile/selector pairs from {} descriptor entries",
                self.unit,
                recorded,
                refs.len()
            );
        }
        Ok(())
    }

    /// Returns the BfRt ID of the object with P4Info ID `p4info_id`.
    pub fn get_bfrt_id(&self, p4info_id: P4InfoId) -> IdMapperResult<BfRtId> {
        self.tables
            .read()
            .ids
            .get_right(&p4info_id)
            .ok_or_else(|| IdMapperError::not_found(format!("P4Info ID {}", p4info_id)))
    }

    /// Returns the P4Info ID of the object with BfRt ID `bfrt_id`.
    pub fn get_p4info_id(&self, bfrt_id: BfRtId) -> IdMapperResult<P4InfoId> {
        self.tables
            .read()
            .ids
            .get_left(&bfrt_id)
            .ok_or_else(|| IdMapperError::not_found(format!("BfRt ID {}", bfrt_id)))
    }

    /// Returns the BfRt ID of the selector driving action profile
    /// `action_profile_id`.
    pub fn get_action_selector_id(&self, action_profile_id: BfRtId) -> IdMapperResult<BfRtId> {
        self.tables
            .read()
            .profile_selector
            .get_right(&action_profile_id)
            .ok_or_else(|| {
                IdMapperError::not_found(format!(
                    "Action selector for action profile {}",
                    action_profile_id
                ))
            })
    }

    /// Returns the BfRt ID of the action profile driven by selector
    /// `action_selector_id`.
    pub fn get_action_profile_id(&self, action_selector_id: BfRtId) -> IdMapperResult<BfRtId> {
        self.tables
            .read()
            .profile_selector
            .get_left(&action_selector_id)
            .ok_or_else(|| {
                IdMapperError::not_found(format!(
                    "Action profile for action selector {}",
                    action_selector_id
                ))
            })
    }

    /// Returns the device target of the object with BfRt ID `bfrt_id`.
    ///
    /// Every mapped object currently covers all pipes of the device. Only
    /// objects of the primary table have a target: a selector that was
    /// resolved through driver names alone answers
    /// [`get_action_profile_id`](Self::get_action_profile_id) but is
    /// `NotFound` here.
    pub fn get_device_target(&self, bfrt_id: BfRtId) -> IdMapperResult<DeviceTarget> {
        if !self.tables.read().ids.contains_right(&bfrt_id) {
            return Err(IdMapperError::not_found(format!("BfRt ID {}", bfrt_id)));
        }
        Ok(DeviceTarget::all_pipes(self.unit))
    }

    /// Copies all tables under one shared acquisition.
    pub fn snapshot(&self) -> MappingSnapshot {
        self.tables.read().snapshot(self.unit)
    }

    /// Number of successful primary pushes.
    pub fn generation(&self) -> u64 {
        self.tables.read().generation
    }

    /// Returns true if the last push failed, in which case lookups reflect
    /// a partially rebuilt table.
    pub fn is_stale(&self) -> bool {
        self.tables.read().stale
    }

    fn prepare(&self, p4info: &P4Info, driver: &dyn DriverMetadata) -> IdMapperResult<PrimaryJoin> {
        translator::join_objects(p4info, driver, &self.config).map_err(|e| self.fail(e))
    }

    fn prepare_indexes(
        &self,
        p4info: &P4Info,
        driver: &dyn DriverMetadata,
    ) -> IdMapperResult<IndirectionIndexes> {
        IndirectionIndexes::build(p4info, driver, &self.config).map_err(|e| self.fail(e))
    }

    /// Marks the tables stale after a push failed before the rebuild began.
    fn fail(&self, error: IdMapperError) -> IdMapperError {
        self.tables.write().stale = true;
        warn!("Device {}: pipeline push failed: {}", self.unit, error);
        error
    }

    fn log_push_summary(&self, p4info: &P4Info, join: &PrimaryJoin, generation: u64) {
        let name = match p4info.pkg_info.name.as_str() {
            "" => "<unnamed>",
            name => name,
        };
        info!(
            "Device {}: pushed pipeline {} (generation {}): {} objects mapped, {} unmatched, {} ambiguous",
            self.unit,
            name,
            generation,
            join.joined.len(),
            join.unmatched,
            join.ambiguous
        );
    }
}
