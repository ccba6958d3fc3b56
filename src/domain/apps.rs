// src/domain/apps.rs

/// An application a single-app or access-plan customer can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogApp {
    pub id: &'static str,
    pub name: &'static str,
}

pub const APP_CATALOG: &[CatalogApp] = &[
    CatalogApp { id: "autocad", name: "AutoCAD" },
    CatalogApp { id: "revit", name: "Revit" },
    CatalogApp { id: "fusion360", name: "Fusion 360" },
    CatalogApp { id: "maya", name: "Maya" },
    CatalogApp { id: "3dsmax", name: "3ds Max" },
    CatalogApp { id: "civil3d", name: "Civil 3D" },
    CatalogApp { id: "inventor", name: "Inventor" },
];

/// Accepts either the id or the display name.
pub fn find_app(value: &str) -> Option<&'static CatalogApp> {
    let value = value.trim();
    APP_CATALOG
        .iter()
        .find(|app| app.id == value || app.name == value)
}
