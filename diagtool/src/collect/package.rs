use std::path::{Path, PathBuf};

/// Marker files whose presence means the host runs the fluent-package build
/// rather than the legacy td-agent one. Either is enough.
pub const FLUENT_PACKAGE_MARKERS: [&str; 2] = ["/etc/fluent/fluentd.conf", "/opt/fluent/bin/fluentd"];

/// Which distribution of the service is installed, and under which names it
/// registers its package and service. Detected once per run and carried in the
/// configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    pub package_name: String,
    pub service_name: String,
}

impl PackageIdentity {
    pub fn fluent_package() -> Self {
        Self {
            package_name: "fluent-package".to_string(),
            service_name: "fluentd".to_string(),
        }
    }

    pub fn td_agent() -> Self {
        Self {
            package_name: "td-agent".to_string(),
            service_name: "td-agent".to_string(),
        }
    }

    pub fn detect() -> Self {
        let markers: Vec<PathBuf> = FLUENT_PACKAGE_MARKERS.iter().map(PathBuf::from).collect();
        Self::detect_in(&markers)
    }

    /// Pure probe over a fixed set of marker paths, OR semantics.
    pub fn detect_in(markers: &[PathBuf]) -> Self {
        if markers.iter().any(|marker| marker.exists()) {
            Self::fluent_package()
        } else {
            Self::td_agent()
        }
    }

    pub fn from_package_name(package_name: &str) -> Self {
        if package_name == "fluent-package" {
            Self::fluent_package()
        } else {
            Self::td_agent()
        }
    }

    /// The gem front-end each distribution ships.
    pub fn gem_command(&self) -> &'static str {
        match self.package_name.as_str() {
            "fluent-package" => "fluent-gem",
            _ => "td-agent-gem",
        }
    }

    /// Manifest of the gems bundled with the package, used to tell manually
    /// installed gems apart from the stock set.
    pub fn bundled_gem_manifest(&self) -> &'static Path {
        match self.package_name.as_str() {
            "fluent-package" => Path::new("/opt/fluent/share/fluent-package-bundled-gems"),
            _ => Path::new("/opt/td-agent/share/td-agent-bundled-gems"),
        }
    }
}
