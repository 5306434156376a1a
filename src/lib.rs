// SPDX-License-Identifier: PMPL-1.0-or-later

//! locsync: hash-checked synchronisation between translation catalogs and
//! Unreal Engine `.locres` dictionaries.
//!
//! The catalog is a sorted NDJSON file that humans and tools edit. The
//! dictionary is the binary resource the game loads. Two directions:
//!
//! 1. **Import** ([`reconcile`]): fold the dictionary's current text into
//!    the catalog. A record is only refreshed when its stored source still
//!    fingerprints to the dictionary's source hash, so a drifted source is
//!    reported as a conflict instead of being overwritten. Translations are
//!    never touched.
//! 2. **Build** ([`compile`]): project translated records into a dictionary,
//!    honouring skip rules and hash overrides.
//!
//! Both directions derive hashes through one [`fingerprint::SourceHasher`],
//! which is what keeps them bit-compatible.

pub mod catalog;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod fingerprint;
pub mod locres;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod skip;
pub mod storage;
pub mod types;
