/// Local-language city names mapped to the provider's canonical
/// "City,CountryCode" identifiers.
const CITY_MAP: &[(&str, &str)] = &[
    ("北京", "Beijing,CN"),
    ("上海", "Shanghai,CN"),
    ("广州", "Guangzhou,CN"),
    ("深圳", "Shenzhen,CN"),
    ("南昌", "Nanchang,CN"),
    ("杭州", "Hangzhou,CN"),
    ("成都", "Chengdu,CN"),
    ("重庆", "Chongqing,CN"),
    ("武汉", "Wuhan,CN"),
    ("西安", "Xian,CN"),
];

/// Resolve the identifier sent to the forecast endpoint. Unmapped names
/// pass through unchanged.
pub fn canonical_city(city: &str) -> String {
    let trimmed = city.trim();
    CITY_MAP
        .iter()
        .find(|(local, _)| *local == trimmed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Cache identity for a destination: lowercase, trimmed.
pub fn cache_key(city: &str) -> String {
    city.trim().to_lowercase()
}
