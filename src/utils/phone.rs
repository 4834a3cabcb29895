// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 国际电话区号到 ISO 3166-1 alpha-2 国家代码的映射
///
/// 只覆盖常见的计费国家；按最长前缀匹配
const DIALING_PREFIXES: &[(&str, &str)] = &[
    ("1", "US"),
    ("7", "RU"),
    ("20", "EG"),
    ("27", "ZA"),
    ("33", "FR"),
    ("34", "ES"),
    ("39", "IT"),
    ("44", "GB"),
    ("49", "DE"),
    ("52", "MX"),
    ("55", "BR"),
    ("60", "MY"),
    ("61", "AU"),
    ("62", "ID"),
    ("63", "PH"),
    ("65", "SG"),
    ("66", "TH"),
    ("81", "JP"),
    ("82", "KR"),
    ("86", "CN"),
    ("90", "TR"),
    ("91", "IN"),
    ("92", "PK"),
    ("94", "LK"),
    ("234", "NG"),
    ("254", "KE"),
    ("880", "BD"),
    ("966", "SA"),
    ("971", "AE"),
    ("977", "NP"),
];

/// 去除电话号码中的非数字字符（包括前导 `+`）
pub fn normalize_phone_number(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 根据 E.164 号码推断国家代码
pub fn country_code_for_number(number: &str) -> Option<&'static str> {
    let digits = normalize_phone_number(number);
    DIALING_PREFIXES
        .iter()
        .filter(|(prefix, _)| digits.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, country)| *country)
}
