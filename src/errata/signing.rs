//! Build signing status: typed view of the `builds_list` document and its summary.
//!
//! The Errata Tool returns signing status as
//!
//! ```text
//! { "<product version>": { "builds": [ { "<nvr>": { "is_signed": bool,
//!       "variant_arch": { "<variant>": { "<arch>": [ { "is_signed": bool }, ... ] } } } } ] } }
//! ```
//!
//! Every level is looked up explicitly and defaults to empty when it is
//! absent or has the wrong shape, so a partial document still summarizes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Signing-status document keyed by product version, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningDocument {
    pub product_versions: Vec<ProductVersionBuilds>,
}

/// Builds attached to one product version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductVersionBuilds {
    pub name: String,
    pub builds: Vec<Build>,
}

/// A build identifier paired with its signing details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub nvr: String,
    pub info: BuildInfo,
}

/// Build-level signing flag plus files grouped by variant then arch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub is_signed: bool,
    pub variant_arch: Vec<VariantFiles>,
}

/// Files of one variant, grouped by arch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantFiles {
    pub variant: String,
    pub arches: Vec<ArchFiles>,
}

/// Files built for one arch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchFiles {
    pub arch: String,
    pub files: Vec<FileEntry>,
}

/// File-level signing flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileEntry {
    pub is_signed: bool,
}

/// Aggregate signing status of a [`SigningDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningSummary {
    pub total_builds: usize,
    pub unsigned_builds: Vec<String>,
    /// False when there are no builds at all.
    pub all_builds_signed: bool,
    pub total_files: usize,
    pub unsigned_files: usize,
    /// False when there are no files at all.
    pub all_files_signed: bool,
}

/// Only a JSON `true` counts as signed; a missing flag or any other value
/// (`"yes"`, `1`) is unsigned.
fn signed_flag(value: &Value) -> bool {
    value
        .get("is_signed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Entries of an object; nothing when absent or not an object.
fn object_entries(value: Option<&Value>) -> impl Iterator<Item = (&String, &Value)> {
    value.and_then(Value::as_object).into_iter().flatten()
}

fn array_or_empty(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl SigningDocument {
    /// Build the typed view from a raw `builds_list` response.
    ///
    /// Build wrappers that are not single-key objects and file entries that
    /// are not objects are dropped.
    pub fn from_value(value: &Value) -> Self {
        let product_versions = object_entries(Some(value))
            .map(|(name, pv)| ProductVersionBuilds {
                name: name.clone(),
                builds: array_or_empty(pv.get("builds"))
                    .iter()
                    .filter_map(Build::from_wrapper)
                    .collect(),
            })
            .collect();

        Self { product_versions }
    }

    pub fn builds(&self) -> impl Iterator<Item = &Build> {
        self.product_versions.iter().flat_map(|pv| pv.builds.iter())
    }

    /// Summarize signing status across every product version.
    pub fn summarize(&self) -> SigningSummary {
        summarize(self)
    }
}

impl<'de> Deserialize<'de> for SigningDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Build {
    /// Unwrap a `{ "<nvr>": { ... } }` entry. Anything else yields `None`.
    fn from_wrapper(wrapper: &Value) -> Option<Self> {
        let map = wrapper.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let (nvr, info) = map.iter().next()?;
        Some(Self {
            nvr: nvr.clone(),
            info: BuildInfo::from_value(info),
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.info
            .variant_arch
            .iter()
            .flat_map(|v| v.arches.iter())
            .flat_map(|a| a.files.iter())
    }
}

impl BuildInfo {
    fn from_value(value: &Value) -> Self {
        let variant_arch = object_entries(value.get("variant_arch"))
            .map(|(variant, arches)| VariantFiles {
                variant: variant.clone(),
                arches: object_entries(Some(arches))
                    .map(|(arch, files)| ArchFiles {
                        arch: arch.clone(),
                        files: array_or_empty(Some(files))
                            .iter()
                            .filter(|f| f.is_object())
                            .map(|f| FileEntry {
                                is_signed: signed_flag(f),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            is_signed: signed_flag(value),
            variant_arch,
        }
    }
}

/// Summarize a signing document.
///
/// Zero builds (or zero files) is reported as *not* all signed.
pub fn summarize(document: &SigningDocument) -> SigningSummary {
    let mut summary = SigningSummary::default();

    for build in document.builds() {
        summary.total_builds += 1;
        if !build.info.is_signed {
            summary.unsigned_builds.push(build.nvr.clone());
        }

        for file in build.files() {
            summary.total_files += 1;
            if !file.is_signed {
                summary.unsigned_files += 1;
            }
        }
    }

    summary.all_builds_signed = summary.total_builds > 0 && summary.unsigned_builds.is_empty();
    summary.all_files_signed = summary.total_files > 0 && summary.unsigned_files == 0;
    summary
}

/// Summarize a raw `builds_list` response.
pub fn summarize_value(value: &Value) -> SigningSummary {
    SigningDocument::from_value(value).summarize()
}
