//! Library dependency graph and topological ordering.
//!
//! Each library lists the libraries it needs loaded first
//! (`preloadedDependencies`). [`build_graph`] walks those declarations from
//! the content manifest's roots and reads every reachable library manifest
//! exactly once. [`resolve`] then orders the graph so that every dependency
//! precedes its dependents.
//!
//! # Example
//!
//! ```
//! use h5p_package::{DependencyGraph, LibraryId, LibraryRecord};
//!
//! let base = LibraryId::new("Vendor.Base", 1, 0).unwrap();
//! let widget = LibraryId::new("Vendor.Widget", 1, 8).unwrap();
//!
//! let mut graph = DependencyGraph::new();
//! graph.insert(LibraryRecord::new(base.clone(), vec![], vec![], vec![]));
//! graph.insert(LibraryRecord::new(widget.clone(), vec![], vec![], vec![base.clone()]));
//!
//! let order = graph.topological_sort().unwrap();
//! assert_eq!(order, vec![base, widget]);
//! ```

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use h5p_fs::PackagePath;

use crate::error::{Error, Result};
use crate::library::{LibraryId, LibraryRecord};
use crate::manifest::LibraryManifest;

/// Maps a library identifier to the location of its manifest.
pub trait LibraryResolver {
    /// Return the path of the library's manifest, or `None` if the library
    /// is not available.
    fn locate(&self, id: &LibraryId) -> Option<PathBuf>;
}

impl<F> LibraryResolver for F
where
    F: Fn(&LibraryId) -> Option<PathBuf>,
{
    fn locate(&self, id: &LibraryId) -> Option<PathBuf> {
        self(id)
    }
}

/// Resolves libraries laid out as `<root>/<MachineName-Major.Minor>/library.json`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a library would occupy under the root.
    pub fn library_dir(&self, id: &LibraryId) -> PathBuf {
        self.root.join(id.dir_name())
    }

    /// List every library directory under the root that carries a manifest.
    ///
    /// Directories whose names are not in `MachineName-Major.Minor` form are
    /// skipped with a warning. The result is sorted.
    pub fn available(&self) -> Result<Vec<LibraryId>> {
        let entries =
            std::fs::read_dir(&self.root).map_err(|e| h5p_fs::Error::io(&self.root, e))?;

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| h5p_fs::Error::io(&self.root, e))?;
            let path = entry.path();
            if !path.join(PackagePath::LibraryManifest.as_str()).is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match LibraryId::from_dir_name(&name) {
                Ok(id) => found.push(id),
                Err(e) => tracing::warn!(dir = %name, error = %e, "Ignoring library directory"),
            }
        }
        found.sort();
        Ok(found)
    }
}

impl LibraryResolver for DirectoryResolver {
    fn locate(&self, id: &LibraryId) -> Option<PathBuf> {
        let manifest = self
            .library_dir(id)
            .join(PackagePath::LibraryManifest.as_str());
        if manifest.is_file() {
            Some(manifest)
        } else {
            tracing::debug!(library = %id, expected = %manifest.display(), "Library manifest not found");
            None
        }
    }
}

/// Libraries keyed by identifier, with edges derived from each record's
/// dependency list.
///
/// An edge `(dep, lib)` means `dep` must load before `lib`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    libraries: HashMap<LibraryId, LibraryRecord>,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing and returning any record with the same id.
    pub fn insert(&mut self, record: LibraryRecord) -> Option<LibraryRecord> {
        self.libraries.insert(record.id().clone(), record)
    }

    pub fn get(&self, id: &LibraryId) -> Option<&LibraryRecord> {
        self.libraries.get(id)
    }

    pub fn contains(&self, id: &LibraryId) -> bool {
        self.libraries.contains_key(id)
    }

    /// Return the number of libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Iterate over all records in unspecified order.
    pub fn libraries(&self) -> impl Iterator<Item = &LibraryRecord> {
        self.libraries.values()
    }

    /// All `(dependency, dependent)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&LibraryId, &LibraryId)> {
        self.libraries
            .values()
            .flat_map(|lib| lib.dependencies().iter().map(move |dep| (dep, lib.id())))
    }

    /// Return the number of edges.
    pub fn edge_count(&self) -> usize {
        self.libraries.values().map(|lib| lib.dependencies().len()).sum()
    }

    /// Direct dependencies of a library; empty if the library is unknown.
    pub fn dependencies_of(&self, id: &LibraryId) -> &[LibraryId] {
        self.libraries
            .get(id)
            .map(LibraryRecord::dependencies)
            .unwrap_or_default()
    }

    /// Verify every referenced dependency is itself a node.
    pub fn check_closure(&self) -> Result<()> {
        match self.edges().find(|(dep, _)| !self.contains(dep)) {
            Some((dep, lib)) => Err(Error::UnresolvedDependency {
                library: dep.clone(),
                required_by: Some(lib.clone()),
            }),
            None => Ok(()),
        }
    }

    /// Discover the transitive closure of `roots` through `resolver`.
    ///
    /// Uses an explicit worklist; the graph's own key set is the visited
    /// set, so shared dependencies are loaded once.
    ///
    /// # Errors
    ///
    /// - `Error::UnresolvedDependency` if the resolver cannot locate a library
    /// - `Error::MalformedManifest` if a library manifest is invalid or
    ///   declares an identity other than the one it was resolved under
    pub fn build(roots: &[LibraryId], resolver: &impl LibraryResolver) -> Result<Self> {
        let mut graph = Self::new();
        let mut pending: Vec<(LibraryId, Option<LibraryId>)> =
            roots.iter().rev().map(|id| (id.clone(), None)).collect();

        while let Some((id, required_by)) = pending.pop() {
            if graph.contains(&id) {
                continue;
            }

            let manifest_path =
                resolver
                    .locate(&id)
                    .ok_or_else(|| Error::UnresolvedDependency {
                        library: id.clone(),
                        required_by: required_by.clone(),
                    })?;
            let manifest = LibraryManifest::from_path(&manifest_path)?;
            manifest.check_identity(&id, &manifest_path)?;

            let record = LibraryRecord::from_manifest(id.clone(), &manifest);
            pending.extend(
                record
                    .dependencies()
                    .iter()
                    .rev()
                    .filter(|dep| !graph.contains(dep))
                    .map(|dep| (dep.clone(), Some(id.clone()))),
            );
            tracing::trace!(library = %id, deps = record.dependencies().len(), "Discovered library");
            graph.insert(record);
        }

        Ok(graph)
    }

    /// Perform a topological sort using Kahn's algorithm.
    ///
    /// Returns identifiers in dependency-first order. Among libraries that
    /// are ready at the same time the smallest identifier goes first, which
    /// keeps the output stable for a given graph.
    ///
    /// # Errors
    ///
    /// - `Error::UnresolvedDependency` if an edge names a missing library
    /// - `Error::CyclicDependency` if the graph contains a cycle; no partial
    ///   order is returned
    pub fn topological_sort(&self) -> Result<Vec<LibraryId>> {
        self.check_closure()?;

        let mut in_degree: HashMap<&LibraryId, usize> =
            self.libraries.keys().map(|id| (id, 0)).collect();
        let mut dependents: HashMap<&LibraryId, Vec<&LibraryId>> = HashMap::new();
        for (dep, lib) in self.edges() {
            if let Some(deg) = in_degree.get_mut(lib) {
                *deg += 1;
            }
            dependents.entry(dep).or_default().push(lib);
        }

        let mut ready: BinaryHeap<Reverse<&LibraryId>> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(self.libraries.len());
        while let Some(Reverse(current)) = ready.pop() {
            order.push(current.clone());
            for &next in dependents.get(current).into_iter().flatten() {
                if let Some(deg) = in_degree.get_mut(next) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }

        if order.len() != self.libraries.len() {
            let blocked: HashSet<&LibraryId> = in_degree
                .into_iter()
                .filter(|&(_, deg)| deg > 0)
                .map(|(id, _)| id)
                .collect();
            return Err(Error::CyclicDependency {
                cycle: self.find_cycle(&blocked),
            });
        }

        Ok(order)
    }

    /// Extract one concrete cycle from the libraries Kahn's algorithm could
    /// not order, listed so each entry is a dependency of the next.
    ///
    /// Every blocked library has at least one blocked dependency, so
    /// following those links from any blocked library revisits a node.
    fn find_cycle<'a>(&'a self, blocked: &HashSet<&'a LibraryId>) -> Vec<LibraryId> {
        let Some(&start) = blocked.iter().min() else {
            return Vec::new();
        };

        let mut path: Vec<&'a LibraryId> = Vec::new();
        let mut position: HashMap<&'a LibraryId, usize> = HashMap::new();
        let mut current = start;
        loop {
            if let Some(&idx) = position.get(current) {
                return path[idx..].iter().rev().map(|&id| id.clone()).collect();
            }
            position.insert(current, path.len());
            path.push(current);

            match self
                .dependencies_of(current)
                .iter()
                .filter(|dep| blocked.contains(dep))
                .min()
            {
                Some(next) => current = next,
                None => return path.into_iter().rev().cloned().collect(),
            }
        }
    }
}

/// Build the dependency graph for `roots`. See [`DependencyGraph::build`].
pub fn build_graph(roots: &[LibraryId], resolver: &impl LibraryResolver) -> Result<DependencyGraph> {
    DependencyGraph::build(roots, resolver)
}

/// Order every library in `graph` dependency-first. See
/// [`DependencyGraph::topological_sort`].
pub fn resolve(graph: &DependencyGraph) -> Result<Vec<LibraryId>> {
    graph.topological_sort()
}
