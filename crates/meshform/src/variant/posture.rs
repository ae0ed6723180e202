//! Posture check kinds.
//!
//! The five kinds are independent siblings: any combination may be configured at once. Each
//! kind has shape rules of its own though, which are checked in both directions: an OS version
//! check names at least one platform, a geo-location check at least one location, a network
//! range check at least one range, a process check at least one process, and every process at
//! least one platform path.
use crate::{
    api::{
        CheckAction, Checks, GeoLocationCheck, Location, MinKernelVersionCheck, MinVersionCheck,
        OsVersionCheck, PeerNetworkRangeCheck, Process, ProcessCheck,
    },
    convert::{
        self, Field, list_to_config, optional_to_config, optional_to_remote, required_to_remote,
        set_to_config, set_to_remote,
    },
    value::{ListValue, SetValue, Value, merge::impl_merge},
};

type Result<T, E = convert::Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VersionCheckConfig {
    pub min_version: Value<String>,
}

/// Minimum versions per platform. `linux` and `windows` hold kernel versions.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OsVersionCheckConfig {
    pub android: Value<String>,
    pub darwin: Value<String>,
    pub ios: Value<String>,
    pub linux: Value<String>,
    pub windows: Value<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LocationConfig {
    pub country_code: Value<String>,
    pub city_name: Value<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GeoLocationCheckConfig {
    pub locations: ListValue<LocationConfig>,
    pub action: Value<CheckAction>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NetworkRangeCheckConfig {
    pub ranges: SetValue<String>,
    pub action: Value<CheckAction>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessConfig {
    pub linux_path: Value<String>,
    pub mac_path: Value<String>,
    pub windows_path: Value<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessCheckConfig {
    pub processes: ListValue<ProcessConfig>,
}

/// All check kinds of a posture check, each independently nullable.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChecksConfig {
    pub nb_version: Value<VersionCheckConfig>,
    pub os_version: Value<OsVersionCheckConfig>,
    pub geo_location: Value<GeoLocationCheckConfig>,
    pub network_range: Value<NetworkRangeCheckConfig>,
    pub process: Value<ProcessCheckConfig>,
}

impl_merge!(ChecksConfig {
    nb_version,
    os_version,
    geo_location,
    network_range,
    process,
});

impl ChecksConfig {
    /// Whether every check kind is null. Unknown kinds may still turn out set.
    pub fn is_empty(&self) -> bool {
        self.nb_version.is_null()
            && self.os_version.is_null()
            && self.geo_location.is_null()
            && self.network_range.is_null()
            && self.process.is_null()
    }
}

/// Decodes every present check kind; absent kinds become null.
pub fn decode_checks(remote: &Checks, field: Field) -> Result<ChecksConfig> {
    let config = ChecksConfig {
        nb_version: remote
            .nb_version_check
            .as_ref()
            .map(decode_version_check)
            .into(),
        os_version: remote
            .os_version_check
            .as_ref()
            .map(|check| decode_os_version_check(check, field.field(&"os_version_check")))
            .transpose()?
            .into(),
        geo_location: remote
            .geo_location_check
            .as_ref()
            .map(|check| decode_geo_location_check(check, field.field(&"geo_location_check")))
            .transpose()?
            .into(),
        network_range: remote
            .peer_network_range_check
            .as_ref()
            .map(|check| {
                decode_network_range_check(check, field.field(&"peer_network_range_check"))
            })
            .transpose()?
            .into(),
        process: remote
            .process_check
            .as_ref()
            .map(|check| decode_process_check(check, field.field(&"process_check")))
            .transpose()?
            .into(),
    };
    tracing::trace!(
        checks.field = %field.path(),
        checks.empty = config.is_empty(),
        "decoded posture checks"
    );
    Ok(config)
}

/// Encodes every configured check kind; null kinds are omitted.
pub fn encode_checks(config: &ChecksConfig, field: Field) -> Result<Checks> {
    Ok(Checks {
        nb_version_check: encode_sibling(
            &config.nb_version,
            field.field(&"nb_version_check"),
            encode_version_check,
        )?,
        os_version_check: encode_sibling(
            &config.os_version,
            field.field(&"os_version_check"),
            encode_os_version_check,
        )?,
        geo_location_check: encode_sibling(
            &config.geo_location,
            field.field(&"geo_location_check"),
            encode_geo_location_check,
        )?,
        peer_network_range_check: encode_sibling(
            &config.network_range,
            field.field(&"peer_network_range_check"),
            encode_network_range_check,
        )?,
        process_check: encode_sibling(
            &config.process,
            field.field(&"process_check"),
            encode_process_check,
        )?,
    })
}

fn encode_sibling<C, R>(
    value: &Value<C>,
    field: Field,
    encode: impl FnOnce(&C, Field) -> Result<R>,
) -> Result<Option<R>> {
    match value {
        Value::Known(config) => {
            tracing::trace!(check.field = %field.path(), "encoding posture check");
            encode(config, field).map(Some)
        }
        Value::Null => Ok(None),
        Value::Unknown => Err(field.error_unknown()),
    }
}

fn decode_version_check(check: &MinVersionCheck) -> VersionCheckConfig {
    VersionCheckConfig {
        min_version: Value::Known(check.min_version.clone()),
    }
}

fn encode_version_check(config: &VersionCheckConfig, field: Field) -> Result<MinVersionCheck> {
    Ok(MinVersionCheck {
        min_version: required_to_remote(&config.min_version, field.field(&"min_version"))?,
    })
}

fn decode_os_version_check(check: &OsVersionCheck, field: Field) -> Result<OsVersionCheckConfig> {
    if *check == OsVersionCheck::default() {
        return Err(field.error_shape("at least one platform must be set"));
    }

    let min_version = |check: &Option<MinVersionCheck>| {
        optional_to_config(check.as_ref().map(|check| &check.min_version))
    };
    let min_kernel_version = |check: &Option<MinKernelVersionCheck>| {
        optional_to_config(check.as_ref().map(|check| &check.min_kernel_version))
    };

    Ok(OsVersionCheckConfig {
        android: min_version(&check.android),
        darwin: min_version(&check.darwin),
        ios: min_version(&check.ios),
        linux: min_kernel_version(&check.linux),
        windows: min_kernel_version(&check.windows),
    })
}

fn encode_os_version_check(config: &OsVersionCheckConfig, field: Field) -> Result<OsVersionCheck> {
    let min_version = |value: &Value<String>, platform: &'static str| {
        optional_to_remote(value, field.field(&platform))
            .map(|version| version.map(|min_version| MinVersionCheck { min_version }))
    };
    let min_kernel_version = |value: &Value<String>, platform: &'static str| {
        optional_to_remote(value, field.field(&platform)).map(|version| {
            version.map(|min_kernel_version| MinKernelVersionCheck { min_kernel_version })
        })
    };

    let check = OsVersionCheck {
        android: min_version(&config.android, "android")?,
        darwin: min_version(&config.darwin, "darwin")?,
        ios: min_version(&config.ios, "ios")?,
        linux: min_kernel_version(&config.linux, "linux")?,
        windows: min_kernel_version(&config.windows, "windows")?,
    };

    if check == OsVersionCheck::default() {
        return Err(field.error_shape("at least one platform must be set"));
    }
    Ok(check)
}

fn decode_geo_location_check(
    check: &GeoLocationCheck,
    field: Field,
) -> Result<GeoLocationCheckConfig> {
    if check.locations.is_empty() {
        return Err(field
            .field(&"locations")
            .error_shape("at least one location must be set"));
    }

    Ok(GeoLocationCheckConfig {
        locations: check
            .locations
            .iter()
            .map(|location| LocationConfig {
                country_code: Value::Known(location.country_code.clone()),
                city_name: optional_to_config(location.city_name.as_ref()),
            })
            .collect(),
        action: Value::Known(check.action),
    })
}

fn encode_geo_location_check(
    config: &GeoLocationCheckConfig,
    field: Field,
) -> Result<GeoLocationCheck> {
    let locations_field = field.field(&"locations");
    let locations = match &config.locations {
        ListValue::Known(locations) if !locations.is_empty() => locations,
        ListValue::Unknown => return Err(locations_field.error_unknown()),
        ListValue::Known(_) | ListValue::Null => {
            return Err(locations_field.error_shape("at least one location must be set"));
        }
    };

    let locations = locations
        .iter()
        .enumerate()
        .map(|(index, location)| {
            let location_field = locations_field.field(&index);
            Ok(Location {
                country_code: required_to_remote(
                    &location.country_code,
                    location_field.field(&"country_code"),
                )?,
                city_name: optional_to_remote(
                    &location.city_name,
                    location_field.field(&"city_name"),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GeoLocationCheck {
        locations,
        action: required_to_remote(&config.action, field.field(&"action"))?,
    })
}

fn decode_network_range_check(
    check: &PeerNetworkRangeCheck,
    field: Field,
) -> Result<NetworkRangeCheckConfig> {
    if check.ranges.is_empty() {
        return Err(field
            .field(&"ranges")
            .error_shape("at least one range must be set"));
    }

    Ok(NetworkRangeCheckConfig {
        ranges: set_to_config(Some(check.ranges.as_slice())),
        action: Value::Known(check.action),
    })
}

fn encode_network_range_check(
    config: &NetworkRangeCheckConfig,
    field: Field,
) -> Result<PeerNetworkRangeCheck> {
    let ranges_field = field.field(&"ranges");
    let ranges = set_to_remote(&config.ranges, ranges_field)?.unwrap_or_default();
    if ranges.is_empty() {
        return Err(ranges_field.error_shape("at least one range must be set"));
    }

    Ok(PeerNetworkRangeCheck {
        ranges,
        action: required_to_remote(&config.action, field.field(&"action"))?,
    })
}

fn process_has_path(process: &Process) -> bool {
    process.linux_path.is_some() || process.mac_path.is_some() || process.windows_path.is_some()
}

fn decode_process_check(check: &ProcessCheck, field: Field) -> Result<ProcessCheckConfig> {
    let processes_field = field.field(&"processes");
    if check.processes.is_empty() {
        return Err(processes_field.error_shape("at least one process must be set"));
    }
    if let Some(index) = check
        .processes
        .iter()
        .position(|process| !process_has_path(process))
    {
        return Err(processes_field
            .field(&index)
            .error_shape("at least one platform path must be set"));
    }

    let processes = check
        .processes
        .iter()
        .map(|process| ProcessConfig {
            linux_path: optional_to_config(process.linux_path.as_ref()),
            mac_path: optional_to_config(process.mac_path.as_ref()),
            windows_path: optional_to_config(process.windows_path.as_ref()),
        })
        .collect::<Vec<_>>();

    Ok(ProcessCheckConfig {
        processes: list_to_config(Some(processes.as_slice())),
    })
}

fn encode_process_check(config: &ProcessCheckConfig, field: Field) -> Result<ProcessCheck> {
    let processes_field = field.field(&"processes");
    let processes = match &config.processes {
        ListValue::Known(processes) if !processes.is_empty() => processes,
        ListValue::Unknown => return Err(processes_field.error_unknown()),
        ListValue::Known(_) | ListValue::Null => {
            return Err(processes_field.error_shape("at least one process must be set"));
        }
    };

    let processes = processes
        .iter()
        .enumerate()
        .map(|(index, process)| {
            let process_field = processes_field.field(&index);
            let process = Process {
                linux_path: optional_to_remote(
                    &process.linux_path,
                    process_field.field(&"linux_path"),
                )?,
                mac_path: optional_to_remote(&process.mac_path, process_field.field(&"mac_path"))?,
                windows_path: optional_to_remote(
                    &process.windows_path,
                    process_field.field(&"windows_path"),
                )?,
            };
            if process_has_path(&process) {
                Ok(process)
            } else {
                Err(process_field.error_shape("at least one platform path must be set"))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProcessCheck { processes })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn known(value: &str) -> Value<String> {
        Value::Known(value.to_owned())
    }

    const ALL_CHECKS: &str = indoc! {r#"
        {
          "nb_version_check": { "min_version": "0.28.0" },
          "os_version_check": {
            "android": { "min_version": "13" },
            "linux": { "min_kernel_version": "5.10.0" }
          },
          "geo_location_check": {
            "locations": [
              { "country_code": "DE", "city_name": "Berlin" },
              { "country_code": "FR" }
            ],
            "action": "allow"
          },
          "peer_network_range_check": {
            "ranges": ["192.168.0.0/16", "10.0.0.0/8"],
            "action": "deny"
          },
          "process_check": {
            "processes": [
              { "linux_path": "/usr/bin/falcon-sensor", "windows_path": "C:\\falcon.exe" }
            ]
          }
        }
    "#};

    #[test]
    fn decode_all_kinds_at_once() {
        let remote: Checks = serde_json::from_str(ALL_CHECKS).unwrap();
        let root = Field::root();

        let config = decode_checks(&remote, root.field(&"checks")).unwrap();

        assert_eq!(
            config.nb_version,
            Value::Known(VersionCheckConfig {
                min_version: known("0.28.0")
            })
        );
        assert_eq!(
            config.os_version,
            Value::Known(OsVersionCheckConfig {
                android: known("13"),
                linux: known("5.10.0"),
                ..Default::default()
            })
        );
        let geo = config.geo_location.as_known().unwrap();
        assert_eq!(
            geo.locations.as_known().map(<[_]>::len),
            Some(2),
            "location order and count are preserved"
        );
        assert_eq!(
            geo.locations.as_known().map(|l| l[1].city_name.clone()),
            Some(Value::Null)
        );
        assert!(config.network_range.is_known());
        assert!(config.process.is_known());
    }

    #[test]
    fn round_trip_all_kinds() {
        let remote: Checks = serde_json::from_str(ALL_CHECKS).unwrap();
        let root = Field::root();

        let config = decode_checks(&remote, root.field(&"checks")).unwrap();
        let encoded = encode_checks(&config, root.field(&"checks")).unwrap();

        // Network ranges are a set, and come back sorted.
        let mut expected = remote;
        if let Some(check) = &mut expected.peer_network_range_check {
            check.ranges.sort();
        }
        assert_eq!(encoded, expected);
    }

    #[test]
    fn absent_kinds_decode_to_null() {
        let root = Field::root();
        let config = decode_checks(&Checks::default(), root.field(&"checks")).unwrap();

        assert!(config.is_empty());
        assert_eq!(
            encode_checks(&config, root.field(&"checks")).unwrap(),
            Checks::default()
        );
    }

    #[test]
    fn os_version_check_without_platform() {
        let root = Field::root();
        let remote = Checks {
            os_version_check: Some(OsVersionCheck::default()),
            ..Default::default()
        };

        let err = decode_checks(&remote, root.field(&"checks")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "checks.os_version_check: at least one platform must be set"
        );

        let config = ChecksConfig {
            os_version: Value::Known(OsVersionCheckConfig::default()),
            ..Default::default()
        };
        assert!(matches!(
            encode_checks(&config, root.field(&"checks")),
            Err(convert::Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn process_without_path() {
        let root = Field::root();
        let config = ChecksConfig {
            process: Value::Known(ProcessCheckConfig {
                processes: ListValue::Known(vec![
                    ProcessConfig {
                        mac_path: known("/Applications/Agent.app"),
                        ..Default::default()
                    },
                    ProcessConfig::default(),
                ]),
            }),
            ..Default::default()
        };

        let err = encode_checks(&config, root.field(&"checks")).unwrap_err();
        assert_eq!(err.field().to_string(), "checks.process_check.processes.1");
    }

    #[test]
    fn geo_location_requires_locations_and_action() {
        let root = Field::root();
        let mut geo = GeoLocationCheckConfig {
            locations: ListValue::Known(Vec::new()),
            action: Value::Known(CheckAction::Allow),
        };
        let config = |geo: &GeoLocationCheckConfig| ChecksConfig {
            geo_location: Value::Known(geo.clone()),
            ..Default::default()
        };

        assert!(matches!(
            encode_checks(&config(&geo), root.field(&"checks")),
            Err(convert::Error::InvalidShape { .. })
        ));

        geo.locations = ListValue::Known(vec![LocationConfig {
            country_code: known("DE"),
            city_name: Value::Null,
        }]);
        geo.action = Value::Null;
        assert_eq!(
            encode_checks(&config(&geo), root.field(&"checks"))
                .unwrap_err()
                .to_string(),
            "checks.geo_location_check.action: value is required but null"
        );
    }

    #[test]
    fn unknown_kind_is_not_encoded() {
        let root = Field::root();
        let config = ChecksConfig {
            network_range: Value::Unknown,
            ..Default::default()
        };

        assert!(matches!(
            encode_checks(&config, root.field(&"checks")),
            Err(convert::Error::UnknownValue { .. })
        ));
    }
}
