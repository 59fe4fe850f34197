//! Metric descriptors and the shared metric catalog.
//!
//! Every report tool is bound to exactly one GA4 metric. The catalog maps
//! each metric name to the set of dimensions it may be grouped or filtered
//! by, and is built once at startup: either from the compiled-in whitelists
//! below or from a single metadata fetch.

use std::collections::{BTreeMap, BTreeSet};

/// Metric name for the `activeUsers` report.
pub const ACTIVE_USERS: &str = "activeUsers";
/// Metric name for the `active1DayUsers` report.
pub const ACTIVE_1_DAY_USERS: &str = "active1DayUsers";
/// Metric name for the `active7DayUsers` report.
pub const ACTIVE_7_DAY_USERS: &str = "active7DayUsers";
/// Metric name for the `active28DayUsers` report.
pub const ACTIVE_28_DAY_USERS: &str = "active28DayUsers";
/// Metric name for the `adUnitExposure` report.
pub const AD_UNIT_EXPOSURE: &str = "adUnitExposure";

/// All metrics with a report tool, in tool listing order.
pub const SUPPORTED_METRICS: [&str; 5] = [
    ACTIVE_USERS,
    ACTIVE_1_DAY_USERS,
    ACTIVE_7_DAY_USERS,
    ACTIVE_28_DAY_USERS,
    AD_UNIT_EXPOSURE,
];

// Dimension groups shared between the built-in whitelists.

const TIME: &[&str] = &["date", "dayOfWeek", "week", "month", "year"];
const GEO: &[&str] = &["continent", "country", "region", "city"];
const GEO_IDS: &[&str] = &["countryId", "regionId", "cityId"];
const PLATFORM: &[&str] = &[
    "platform",
    "deviceCategory",
    "operatingSystem",
    "browser",
    "screenResolution",
];
const MOBILE_DEVICE: &[&str] = &["mobileDeviceBranding", "mobileDeviceMarketingName"];
const LEGACY_DEVICE: &[&str] = &["browserVersion", "deviceBrand", "deviceModel"];
const APP_SCREEN: &[&str] = &["appVersion", "screenName", "screenClass"];
const UNIFIED_SCREEN: &[&str] = &[
    "appVersion",
    "unifiedScreenName",
    "unifiedScreenClass",
    "streamId",
    "streamName",
];
const USER: &[&str] = &["language", "newVsReturning", "userType"];
const SIGNED_IN_USER: &[&str] = &["language", "newVsReturning", "signedInWithUserId", "userId"];
const TRAFFIC_SOURCE: &[&str] = &["source", "medium", "campaignName", "defaultChannelGroup"];
const FIRST_USER_SOURCE: &[&str] = &[
    "firstUserSource",
    "firstUserMedium",
    "firstUserCampaignName",
    "firstUserDefaultChannelGroup",
    "firstUserGoogleAdsAccountName",
];
const SESSION_SOURCE: &[&str] = &["sessionSource", "sessionMedium", "sessionCampaignName"];
const AD: &[&str] = &["adUnitName", "adFormat", "adSourceName"];
const AUDIENCE_CONTENT_EVENT: &[&str] = &["audienceName", "pagePath", "pageTitle", "eventName"];

/// A GA4 metric and the dimensions it is compatible with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    name: String,
    dimensions: BTreeSet<String>,
}

impl MetricDescriptor {
    /// Creates a descriptor from a metric name and its supported dimensions.
    pub fn new<I, S>(name: impl Into<String>, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            dimensions: dimensions.into_iter().map(Into::into).collect(),
        }
    }

    fn from_groups(name: &str, groups: &[&[&str]]) -> Self {
        Self::new(name, groups.iter().flat_map(|g| g.iter().copied()))
    }

    /// GA4 API name of the metric.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if `dimension` may be used with this metric.
    #[must_use]
    pub fn supports(&self, dimension: &str) -> bool {
        self.dimensions.contains(dimension)
    }

    /// Supported dimensions in sorted order.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(String::as_str)
    }

    /// Number of supported dimensions.
    #[must_use]
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }
}

/// Read-only table of metric descriptors, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricCatalog {
    metrics: BTreeMap<String, MetricDescriptor>,
}

impl MetricCatalog {
    /// Catalog with the compiled-in dimension whitelists.
    #[must_use]
    pub fn builtin() -> Self {
        let descriptors = [
            MetricDescriptor::from_groups(
                ACTIVE_USERS,
                &[
                    TIME,
                    GEO,
                    PLATFORM,
                    MOBILE_DEVICE,
                    UNIFIED_SCREEN,
                    SIGNED_IN_USER,
                    FIRST_USER_SOURCE,
                    TRAFFIC_SOURCE,
                    SESSION_SOURCE,
                ],
            ),
            MetricDescriptor::from_groups(
                ACTIVE_1_DAY_USERS,
                &[TIME, GEO, PLATFORM, USER, TRAFFIC_SOURCE, SESSION_SOURCE, APP_SCREEN],
            ),
            MetricDescriptor::from_groups(
                ACTIVE_7_DAY_USERS,
                &[
                    TIME,
                    GEO,
                    PLATFORM,
                    MOBILE_DEVICE,
                    &["operatingSystemVersion"],
                    UNIFIED_SCREEN,
                    SIGNED_IN_USER,
                    FIRST_USER_SOURCE,
                    TRAFFIC_SOURCE,
                    SESSION_SOURCE,
                ],
            ),
            MetricDescriptor::from_groups(
                ACTIVE_28_DAY_USERS,
                &[
                    TIME,
                    GEO,
                    GEO_IDS,
                    PLATFORM,
                    &["operatingSystemVersion"],
                    LEGACY_DEVICE,
                    USER,
                    TRAFFIC_SOURCE,
                    SESSION_SOURCE,
                    APP_SCREEN,
                    AUDIENCE_CONTENT_EVENT,
                ],
            ),
            MetricDescriptor::from_groups(
                AD_UNIT_EXPOSURE,
                &[
                    AD,
                    &["platform", "appVersion", "deviceCategory", "operatingSystem"],
                    MOBILE_DEVICE,
                    &["country", "region", "city", "language", "date"],
                ],
            ),
        ];

        Self::from_descriptors(descriptors)
    }

    /// Catalog where every supported metric accepts the same dimension list,
    /// typically the property's full dimension list from the metadata API.
    pub fn uniform<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dimensions: BTreeSet<String> = dimensions.into_iter().map(Into::into).collect();
        Self::from_descriptors(
            SUPPORTED_METRICS
                .iter()
                .map(|name| MetricDescriptor::new(*name, dimensions.iter().cloned())),
        )
    }

    /// Builds a catalog from arbitrary descriptors. Later duplicates win.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = MetricDescriptor>) -> Self {
        Self {
            metrics: descriptors
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    /// Looks up a metric by its GA4 API name.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&MetricDescriptor> {
        self.metrics.get(metric)
    }

    /// Iterates over all descriptors in metric-name order.
    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.metrics.values()
    }

    /// Number of metrics in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` if the catalog has no metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
