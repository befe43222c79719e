pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_NEARBY_LIMIT: usize = 10;
pub const DEFAULT_RECOMMEND_LIMIT: usize = 5;

pub const USER_SEARCH_MIN_LEN: usize = 2;
pub const USER_SEARCH_LIMIT: i64 = 10;

pub const RECOMMEND_ALGORITHM: &str = "distance_and_rating_based";

/// Always offered by the categories endpoint, whether or not any spot uses them.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["グルメ", "観光", "ショッピング", "エンターテイメント", "自然", "文化"];
