//! Package construction for each kind of graph node.

use super::builder::DocumentBuilder;
use crate::error::{CompileErrorKind, Result, SbomError};
use crate::locator::{download_location, package_url};
use crate::model::{
    Checksum, ChecksumAlgorithm, ExternalRef, ModuleCoordinates, ResolvedComponent, SpdxPackage,
    NOASSERTION,
};
use crate::supplier::infer_supplier;

impl<'c> DocumentBuilder<'c> {
    /// Root package that describes the document when an uber package is
    /// configured.
    pub(super) fn uber_package(&mut self, name: &str, version: &str, supplier: &str) -> SpdxPackage {
        let mut package = SpdxPackage::new(self.ids.allocate(name), name);
        package.version_info = Some(version.to_string());
        package.supplier = Some(supplier.to_string());
        package
    }

    /// Package for a workspace project, or `None` when the extension vetoes it.
    pub(super) fn project_package(&mut self, path: &str) -> Result<Option<SpdxPackage>> {
        let inputs = self.inputs;
        let project = inputs.projects.get(path).ok_or_else(|| {
            SbomError::compile(
                "creating project package",
                CompileErrorKind::UnknownProject(path.to_string()),
            )
        })?;

        if !self.extension.should_create_package_for_project(project) {
            tracing::debug!(project = %project.path, "Project excluded by extension");
            return Ok(None);
        }

        let version = if project.has_unspecified_version() {
            tracing::warn!(
                project = %project.name,
                "SPDX requires a package version but the project has no specified version"
            );
            NOASSERTION.to_string()
        } else {
            project.version.clone()
        };

        let supplier = match &self.settings.package_supplier {
            Some(supplier) => supplier.clone(),
            None => {
                tracing::warn!(project = %project.name, "Supplier not set for project");
                NOASSERTION.to_string()
            }
        };

        let mut package = SpdxPackage::new(self.ids.allocate(&project.name), &project.name);
        package.version_info = Some(version);
        package.supplier = Some(supplier);
        package.description = project.description.clone();
        package.source_info = inputs.scm.as_ref().map(|scm| {
            self.extension
                .map_scm_for_project(scm, project)
                .source_info(project)
        });
        Ok(Some(package))
    }

    /// One package per resolved artifact file of an external module.
    ///
    /// Modules without artifacts produce no package. A module without a
    /// manifest is skipped when non-Maven dependencies are ignored and is
    /// fatal otherwise, as is a module without repository attribution.
    pub(super) fn module_packages(
        &mut self,
        node: &ResolvedComponent,
        coords: &ModuleCoordinates,
    ) -> Result<Vec<SpdxPackage>> {
        let inputs = self.inputs;
        let Some(files) = inputs.artifacts.get(&node.id) else {
            return Ok(Vec::new());
        };

        let Some(manifest) = inputs.manifests.get(&node.id) else {
            if self.options.ignore_non_maven_dependencies {
                tracing::info!(component = %node.id, "Skipping component without manifest");
                return Ok(Vec::new());
            }
            return Err(SbomError::compile(
                "creating module package",
                CompileErrorKind::MissingManifest(node.id.display_name()),
            ));
        };

        let repository = node.repository.as_deref().ok_or_else(|| {
            SbomError::compile(
                "creating module package",
                CompileErrorKind::MissingRepository(node.id.display_name()),
            )
        })?;
        let repo_uri = self
            .extension
            .map_repo_uri(inputs.repositories.get(repository), coords);
        if repo_uri.is_none() {
            tracing::debug!(component = %node.id, repository, "No maven repository for component");
        }

        let license = self.licenses.resolve(&manifest.licenses).to_string();
        let supplier = infer_supplier(manifest);
        let homepage = manifest.homepage.as_ref().map(ToString::to_string);
        let name = coords.to_string();

        let mut packages = Vec::with_capacity(files.len());
        for file in files {
            let mut package = SpdxPackage::new(self.ids.allocate(&name), &name);
            package.version_info = Some(coords.version.clone());
            package.supplier = Some(supplier.clone());
            package.license_declared = license.clone();
            package.homepage = homepage.clone();

            if let Some(uri) = &repo_uri {
                package.download_location = download_location(uri, coords, &file.file_name())?;
                package.external_refs = vec![ExternalRef::purl(package_url(uri, coords))];
            }

            let (sha1, sha256) = file.digests()?;
            package.checksums = vec![
                Checksum::new(ChecksumAlgorithm::Sha1, sha1),
                Checksum::new(ChecksumAlgorithm::Sha256, sha256),
            ];
            packages.push(package);
        }
        Ok(packages)
    }
}
