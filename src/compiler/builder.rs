//! Traversal state and document assembly for one compilation.

use super::{CompileOptions, CompileStats, DocumentSettings, SbomExtension};
use super::inputs::CompileInputs;
use crate::error::{CompileErrorKind, Result, SbomError};
use crate::licenses::{KnownLicenses, LicenseResolver};
use crate::model::{
    ComponentId, CreationInfo, ExtractedLicensingInfo, Relationship, ResolvedComponent,
    SpdxDocument, SpdxPackage,
};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// Hands out unique `SPDXRef-` ids derived from package names.
#[derive(Debug, Default)]
pub(super) struct SpdxIdAllocator {
    used: HashSet<String>,
}

impl SpdxIdAllocator {
    /// Reserve an id for `name`, adding `-2`, `-3`, ... on collision.
    pub(super) fn allocate(&mut self, name: &str) -> String {
        let sanitized: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '-' })
            .collect();
        let base = if sanitized.is_empty() {
            "SPDXRef-Package".to_string()
        } else {
            format!("SPDXRef-{sanitized}")
        };

        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        candidate
    }
}

/// Mutable state of one compilation. Owned by a single call to
/// [`SbomCompiler::compile`](super::SbomCompiler::compile) and never shared.
pub(super) struct DocumentBuilder<'c> {
    pub(super) settings: &'c DocumentSettings,
    pub(super) known: &'c KnownLicenses,
    pub(super) extension: &'c dyn SbomExtension,
    pub(super) options: CompileOptions,
    pub(super) inputs: &'c CompileInputs,
    pub(super) licenses: LicenseResolver<'c>,
    pub(super) ids: SpdxIdAllocator,
    pub(super) packages: Vec<SpdxPackage>,
    /// Package indices per visited identity, in visit order. Skipped
    /// identities map to an empty list.
    package_index: IndexMap<ComponentId, Vec<usize>>,
    /// Recorded parent -> child edges between identities
    edges: HashMap<ComponentId, IndexSet<ComponentId>>,
    uber: Option<usize>,
}

impl<'c> DocumentBuilder<'c> {
    pub(super) fn new(
        settings: &'c DocumentSettings,
        known: &'c KnownLicenses,
        extension: &'c dyn SbomExtension,
        options: CompileOptions,
        inputs: &'c CompileInputs,
    ) -> Result<Self> {
        let mut builder = Self {
            settings,
            known,
            extension,
            options,
            inputs,
            licenses: LicenseResolver::new(known),
            ids: SpdxIdAllocator::default(),
            packages: Vec::new(),
            package_index: IndexMap::new(),
            edges: HashMap::new(),
            uber: None,
        };
        if let Some((name, version, supplier)) = settings.uber_package.resolve()? {
            let package = builder.uber_package(name, version, supplier);
            builder.uber = Some(builder.push_package(package));
        }
        Ok(builder)
    }

    pub(super) fn push_package(&mut self, package: SpdxPackage) -> usize {
        self.packages.push(package);
        self.packages.len() - 1
    }

    fn node(&self, id: &ComponentId) -> Result<&'c ResolvedComponent> {
        self.inputs.graph.node(id).ok_or_else(|| {
            SbomError::compile(
                "walking dependency graph",
                CompileErrorKind::MissingNode(id.display_name()),
            )
        })
    }

    /// Depth-first walk from one root. Edges are recorded for every visit,
    /// packages only on the first one.
    fn walk(&mut self, root: &ComponentId) -> Result<()> {
        let mut stack: Vec<(Option<ComponentId>, ComponentId)> = vec![(None, root.clone())];

        while let Some((parent, id)) = stack.pop() {
            if let Some(parent) = parent {
                if parent != id {
                    self.edges.entry(parent).or_default().insert(id.clone());
                }
            }
            if self.package_index.contains_key(&id) {
                continue;
            }

            let node = self.node(&id)?;
            let created = self.create_packages(node)?;
            self.package_index.insert(id.clone(), created);

            for child in node.resolved_children().rev() {
                stack.push((Some(id.clone()), child.clone()));
            }
        }
        Ok(())
    }

    fn create_packages(&mut self, node: &'c ResolvedComponent) -> Result<Vec<usize>> {
        let packages = match &node.id {
            ComponentId::Project { path } => self
                .project_package(path)?
                .into_iter()
                .collect::<Vec<_>>(),
            ComponentId::Module(coords) => self.module_packages(node, coords)?,
            ComponentId::Other { display_name } => {
                return Err(SbomError::compile(
                    "classifying component",
                    CompileErrorKind::UnsupportedComponent(display_name.clone()),
                ));
            }
        };
        if packages.is_empty() {
            tracing::info!(component = %node.id, "Ignoring component without package");
        }
        Ok(packages
            .into_iter()
            .map(|package| self.push_package(package))
            .collect())
    }

    /// Packaged identities standing in for `id`: the identity itself when it
    /// has packages, otherwise the nearest packaged descendants.
    fn materialized(
        &self,
        id: &ComponentId,
        memo: &mut HashMap<ComponentId, Vec<ComponentId>>,
        in_progress: &mut IndexSet<ComponentId>,
    ) -> Vec<ComponentId> {
        self.materialize(id, memo, in_progress).0
    }

    /// Returns the targets of `id` and, when the walk ran into a back-edge,
    /// the stack depth of the shallowest node it hit. A result cut short by a
    /// back-edge to an ancestor is partial and is not memoized.
    fn materialize(
        &self,
        id: &ComponentId,
        memo: &mut HashMap<ComponentId, Vec<ComponentId>>,
        in_progress: &mut IndexSet<ComponentId>,
    ) -> (Vec<ComponentId>, Option<usize>) {
        if self.package_index.get(id).is_some_and(|p| !p.is_empty()) {
            return (vec![id.clone()], None);
        }
        if let Some(known) = memo.get(id) {
            return (known.clone(), None);
        }
        if let Some(depth) = in_progress.get_index_of(id) {
            return (Vec::new(), Some(depth));
        }

        let depth = in_progress.len();
        in_progress.insert(id.clone());
        let mut targets: IndexSet<ComponentId> = IndexSet::new();
        let mut low: Option<usize> = None;
        if let Some(children) = self.edges.get(id) {
            for child in children {
                let (found, hit) = self.materialize(child, memo, in_progress);
                targets.extend(found);
                low = match (low, hit) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
        }
        in_progress.pop();

        let targets: Vec<_> = targets.into_iter().collect();
        match low {
            Some(hit) if hit < depth => (targets, Some(hit)),
            _ => {
                memo.insert(id.clone(), targets.clone());
                (targets, None)
            }
        }
    }

    fn package_ids(&self, id: &ComponentId) -> impl Iterator<Item = &str> {
        self.package_index
            .get(id)
            .into_iter()
            .flatten()
            .map(|&idx| self.packages[idx].spdx_id.as_str())
    }

    /// Run the traversal and assemble the document.
    pub(super) fn build(mut self, roots: &[ComponentId]) -> Result<(SpdxDocument, CompileStats)> {
        for root in roots {
            self.walk(root)?;
        }

        let mut memo = HashMap::new();
        let mut in_progress = IndexSet::new();
        let mut relationships: IndexSet<(String, String)> = IndexSet::new();

        for (parent, indices) in &self.package_index {
            let Some(&primary) = indices.first() else {
                continue;
            };
            let from = self.packages[primary].spdx_id.clone();
            let Some(children) = self.edges.get(parent) else {
                continue;
            };
            for child in children {
                for target in self.materialized(child, &mut memo, &mut in_progress) {
                    for to in self.package_ids(&target) {
                        if to != from {
                            relationships.insert((from.clone(), to.to_string()));
                        }
                    }
                }
            }
        }

        let mut root_packages: IndexSet<String> = IndexSet::new();
        for root in roots {
            for target in self.materialized(root, &mut memo, &mut in_progress) {
                root_packages.extend(self.package_ids(&target).map(str::to_string));
            }
        }

        let document_describes: Vec<String> = match self.uber {
            Some(uber) => {
                let from = self.packages[uber].spdx_id.clone();
                for to in &root_packages {
                    if *to != from {
                        relationships.insert((from.clone(), to.clone()));
                    }
                }
                vec![from]
            }
            None => root_packages.into_iter().collect(),
        };

        let mut creators = vec![format!("Tool: {}", super::TOOL_NAME)];
        creators.extend(self.settings.creator.clone());
        let created = self
            .settings
            .created
            .unwrap_or_else(chrono::Utc::now)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        let mut document = SpdxDocument::new(
            self.settings.name.clone(),
            self.settings.namespace.clone(),
            CreationInfo {
                created,
                creators,
                license_list_version: self.known.license_list_version().map(str::to_string),
            },
        );

        let stats = CompileStats {
            components_visited: self.package_index.len(),
            packages: self.packages.len(),
            skipped: self.package_index.values().filter(|p| p.is_empty()).count(),
            relationships: relationships.len(),
            extracted_licenses: self.licenses.extracted().len(),
        };

        document.document_describes = document_describes;
        document.relationships = relationships
            .into_iter()
            .map(|(from, to)| Relationship::depends_on(from, to))
            .collect();
        document.has_extracted_licensing_infos = self
            .licenses
            .extracted()
            .iter()
            .map(|license| ExtractedLicensingInfo::from(license.as_ref()))
            .collect();
        document.packages = self.packages;

        Ok((document, stats))
    }
}
