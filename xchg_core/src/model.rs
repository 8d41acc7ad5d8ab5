//! # Structural Model Boundary
//!
//! Read-only view of the analysis model being exported. Mesh generation and
//! solving happen elsewhere; the exporter only needs node coordinates, face
//! topology, supports and loads, which it reads through [`StructuralModel`].
//!
//! [`ModelData`] is the plain in-memory implementation. It deserializes from
//! JSON and also carries the material and load-group dictionaries.
//!
//! ## Example
//!
//! ```rust
//! use xchg_core::model::{LoadCase, ModelData, Node, PointLoad, StructuralModel};
//!
//! let mut model = ModelData::default();
//! model.nodes.push(Node::new(1, [0.0, 0.0, 0.0]));
//! model.load_cases.push(
//!     LoadCase::new("LC1").with_point_load(PointLoad::new(1, [0.0, 0.0, -10_000.0])),
//! );
//!
//! assert_eq!(model.nodes().len(), 1);
//! assert!(xchg_core::model::validate_references(&model).is_ok());
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{ExportError, ExportResult};

/// A mesh node: tag and global coordinate (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: u32,
    pub coordinate: [f64; 3],
}

impl Node {
    pub fn new(tag: u32, coordinate: [f64; 3]) -> Self {
        Node { tag, coordinate }
    }
}

/// A shell face element: its corner nodes in order, thickness (m) and material name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub tag: u32,
    pub node_tags: Vec<u32>,
    pub thickness: f64,
    pub material: String,
}

impl Face {
    pub fn new(tag: u32, node_tags: Vec<u32>, thickness: f64, material: impl Into<String>) -> Self {
        Face {
            tag,
            node_tags,
            thickness,
            material: material.into(),
        }
    }
}

/// Degrees of freedom in the order fixity flags are stored
pub const DOF_NAMES: [&str; 6] = ["X", "Y", "Z", "Rx", "Ry", "Rz"];

/// A nodal boundary condition: `true` means the DOF is restrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub node_tag: u32,
    pub fixity: [bool; 6],
}

impl Support {
    pub fn new(node_tag: u32, fixity: [bool; 6]) -> Self {
        Support { node_tag, fixity }
    }

    /// All six DOFs restrained
    pub fn fixed(node_tag: u32) -> Self {
        Support::new(node_tag, [true; 6])
    }

    /// Translations restrained, rotations free
    pub fn pinned(node_tag: u32) -> Self {
        Support::new(node_tag, [true, true, true, false, false, false])
    }
}

/// A concentrated force at a node (N, global axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    pub node_tag: u32,
    pub force: [f64; 3],
}

impl PointLoad {
    pub fn new(node_tag: u32, force: [f64; 3]) -> Self {
        PointLoad { node_tag, force }
    }
}

/// A uniform pressure on a face element (N/m², along the local normal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLoad {
    pub element_tag: u32,
    pub pressure: f64,
}

impl SurfaceLoad {
    pub fn new(element_tag: u32, pressure: f64) -> Self {
        SurfaceLoad { element_tag, pressure }
    }
}

/// A named load pattern with its point and surface loads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub name: String,
    #[serde(default)]
    pub point_loads: Vec<PointLoad>,
    #[serde(default)]
    pub surface_loads: Vec<SurfaceLoad>,
}

impl LoadCase {
    pub fn new(name: impl Into<String>) -> Self {
        LoadCase {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_point_load(mut self, load: PointLoad) -> Self {
        self.point_loads.push(load);
        self
    }

    pub fn with_surface_load(mut self, load: SurfaceLoad) -> Self {
        self.surface_loads.push(load);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.point_loads.is_empty() && self.surface_loads.is_empty()
    }
}

/// Load group classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadGroupKind {
    Permanent,
    Variable,
}

impl LoadGroupKind {
    pub const ALL: [LoadGroupKind; 2] = [LoadGroupKind::Permanent, LoadGroupKind::Variable];

    /// Enumeration code used in the exported document
    pub fn code(&self) -> &'static str {
        match self {
            LoadGroupKind::Permanent => "0",
            LoadGroupKind::Variable => "1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadGroupKind::Permanent => "Permanent",
            LoadGroupKind::Variable => "Variable",
        }
    }
}

/// A load group; its name is generated from the group number at export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadGroup {
    pub kind: LoadGroupKind,
}

impl LoadGroup {
    pub fn permanent() -> Self {
        LoadGroup { kind: LoadGroupKind::Permanent }
    }

    pub fn variable() -> Self {
        LoadGroup { kind: LoadGroupKind::Variable }
    }
}

/// Material family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Concrete,
    Steel,
    Timber,
    Aluminium,
    Other,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Concrete,
        MaterialKind::Steel,
        MaterialKind::Timber,
        MaterialKind::Aluminium,
        MaterialKind::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MaterialKind::Concrete => "0",
            MaterialKind::Steel => "1",
            MaterialKind::Timber => "2",
            MaterialKind::Aluminium => "3",
            MaterialKind::Other => "4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaterialKind::Concrete => "Concrete",
            MaterialKind::Steel => "Steel",
            MaterialKind::Timber => "Timber",
            MaterialKind::Aluminium => "Aluminium",
            MaterialKind::Other => "Other",
        }
    }
}

/// Isotropic material properties, keyed by name in the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub kind: MaterialKind,
    /// Modulus of elasticity (Pa)
    pub e_modulus: f64,
    pub poisson: f64,
    /// Unit mass (kg/m³)
    pub density: f64,
}

impl Material {
    pub fn new(kind: MaterialKind, e_modulus: f64, poisson: f64, density: f64) -> Self {
        Material {
            kind,
            e_modulus,
            poisson,
            density,
        }
    }
}

/// Read accessors the exporter needs from the analysis model.
pub trait StructuralModel {
    fn nodes(&self) -> Vec<Node>;
    fn faces(&self) -> Vec<Face>;
    fn supports(&self) -> Vec<Support>;
    fn load_cases(&self) -> Vec<LoadCase>;

    /// Names of the materials faces may reference.
    ///
    /// `None` means the model carries no material dictionary and face
    /// materials are not checked.
    fn material_names(&self) -> Option<HashSet<String>> {
        None
    }
}

/// Plain in-memory model, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelData {
    pub nodes: Vec<Node>,
    pub faces: Vec<Face>,
    pub supports: Vec<Support>,
    pub load_cases: Vec<LoadCase>,
    pub materials: HashMap<String, Material>,
    pub load_groups: HashMap<u32, LoadGroup>,
}

impl ModelData {
    pub fn from_json_str(json: &str) -> ExportResult<Self> {
        serde_json::from_str(json).map_err(|e| ExportError::serialization(format!("Invalid model: {}", e)))
    }
}

impl StructuralModel for ModelData {
    fn nodes(&self) -> Vec<Node> {
        self.nodes.clone()
    }

    fn faces(&self) -> Vec<Face> {
        self.faces.clone()
    }

    fn supports(&self) -> Vec<Support> {
        self.supports.clone()
    }

    fn load_cases(&self) -> Vec<LoadCase> {
        self.load_cases.clone()
    }

    /// An empty dictionary counts as absent
    fn material_names(&self) -> Option<HashSet<String>> {
        if self.materials.is_empty() {
            None
        } else {
            Some(self.materials.keys().cloned().collect())
        }
    }
}

/// Check that every face, support and load references an existing node, face
/// or material.
///
/// Faces must span at least 3 distinct nodes. Face materials are only checked
/// when the model reports a material dictionary.
pub fn validate_references<M: StructuralModel + ?Sized>(model: &M) -> ExportResult<()> {
    let node_tags: HashSet<u32> = model.nodes().iter().map(|n| n.tag).collect();
    let faces = model.faces();
    let face_tags: HashSet<u32> = faces.iter().map(|f| f.tag).collect();
    let materials = model.material_names();

    for face in &faces {
        let distinct: HashSet<u32> = face.node_tags.iter().copied().collect();
        if distinct.len() < 3 {
            return Err(ExportError::invalid_input(
                "node_tags",
                format!("{:?}", face.node_tags),
                format!("Face {} needs at least 3 distinct nodes", face.tag),
            ));
        }
        if let Some(missing) = face.node_tags.iter().find(|t| !node_tags.contains(*t)) {
            return Err(ExportError::missing_reference("face", face.tag.to_string(), format!("node {}", missing)));
        }
        if let Some(names) = &materials {
            if !names.contains(&face.material) {
                return Err(ExportError::missing_reference(
                    "face",
                    face.tag.to_string(),
                    format!("material '{}'", face.material),
                ));
            }
        }
    }

    for support in model.supports() {
        if !node_tags.contains(&support.node_tag) {
            return Err(ExportError::missing_reference(
                "support",
                support.node_tag.to_string(),
                format!("node {}", support.node_tag),
            ));
        }
    }

    for case in model.load_cases() {
        for load in &case.point_loads {
            if !node_tags.contains(&load.node_tag) {
                return Err(ExportError::missing_reference(
                    "point load",
                    case.name.clone(),
                    format!("node {}", load.node_tag),
                ));
            }
        }
        for load in &case.surface_loads {
            if !face_tags.contains(&load.element_tag) {
                return Err(ExportError::missing_reference(
                    "surface load",
                    case.name.clone(),
                    format!("face {}", load.element_tag),
                ));
            }
        }
    }
    Ok(())
}
