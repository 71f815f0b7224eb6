use std::collections::BTreeMap;
use std::path::Path;

use crate::assets::color::DARK_MARKER;

/// Locale used when a screenshot directory names a locale without a title table.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Screenshot keys with built-in titles, in capture order.
pub const SCREENSHOT_KEYS: [&str; 13] = [
    "01_NearbyTab",
    "02_NearbyTabGrid",
    "03_ConnectedTab",
    "04_ConnectionView",
    "05_ChatView",
    "06_VoiceCallView",
    "07_LibraryTab",
    "08_Settings",
    "09_QuickConnect",
    "10_FileTransfer",
    "11_TransferHistory",
    "12_UserProfile",
    "13_GroupDetail",
];

// Each row is aligned with `SCREENSHOT_KEYS`.
const BUILTIN_TITLES: [(&str, [&str; 13]); 5] = [
    (
        "en-US",
        [
            "Discover Nearby Devices",
            "Grid View",
            "Active Connections",
            "Connection Details",
            "Secure Chat",
            "Voice Call",
            "Device Library",
            "Settings",
            "Quick Connect",
            "File Transfer",
            "Transfer History",
            "User Profile",
            "Group Details",
        ],
    ),
    (
        "zh-Hant",
        [
            "發現附近裝置",
            "網格檢視",
            "已連接裝置",
            "連接詳情",
            "安全聊天",
            "語音通話",
            "裝置資料庫",
            "設定",
            "快速連接",
            "檔案傳輸",
            "傳輸紀錄",
            "使用者資料",
            "群組詳情",
        ],
    ),
    (
        "zh-Hans",
        [
            "发现附近设备",
            "网格视图",
            "已连接设备",
            "连接详情",
            "安全聊天",
            "语音通话",
            "设备库",
            "设置",
            "快速连接",
            "文件传输",
            "传输记录",
            "用户资料",
            "群组详情",
        ],
    ),
    (
        "ja",
        [
            "近くのデバイスを発見",
            "グリッド表示",
            "アクティブな接続",
            "接続の詳細",
            "セキュアチャット",
            "音声通話",
            "デバイスライブラリ",
            "設定",
            "クイック接続",
            "ファイル転送",
            "転送履歴",
            "ユーザープロフィール",
            "グループ詳細",
        ],
    ),
    (
        "ko",
        [
            "주변 기기 발견",
            "그리드 보기",
            "활성 연결",
            "연결 상세",
            "보안 채팅",
            "음성 통화",
            "기기 라이브러리",
            "설정",
            "빠른 연결",
            "파일 전송",
            "전송 기록",
            "사용자 프로필",
            "그룹 상세",
        ],
    ),
];

/// Locale codes that ship with built-in titles.
pub fn builtin_locales() -> impl Iterator<Item = &'static str> {
    BUILTIN_TITLES.iter().map(|(locale, _)| *locale)
}

/// Built-in title for an exact `(locale, key)` pair.
pub fn builtin_title(locale: &str, key: &str) -> Option<&'static str> {
    let (_, titles) = BUILTIN_TITLES.iter().find(|(l, _)| *l == locale)?;
    let idx = SCREENSHOT_KEYS.iter().position(|k| *k == key)?;
    Some(titles[idx])
}

/// Extract the screenshot key from a file name.
///
/// `"iPhone 17 Pro Max-01_NearbyTab_Dark.png"` becomes `"01_NearbyTab"`: the stem's last
/// `-`-separated segment with every `_Dark` marker removed.
pub fn screenshot_key(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    let key = match stem.rsplit_once('-') {
        Some((_, last)) => last,
        None => &*stem,
    };

    key.replace(DARK_MARKER, "")
}

/// Locale → (screenshot key → title) lookup with a fallback locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleCatalog {
    locales: BTreeMap<String, BTreeMap<String, String>>,
    fallback: String,
}

impl Default for TitleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TitleCatalog {
    /// Catalog holding only the built-in tables, falling back to `en-US`.
    pub fn builtin() -> Self {
        let locales = BUILTIN_TITLES
            .iter()
            .map(|(locale, titles)| {
                let table = SCREENSHOT_KEYS
                    .iter()
                    .zip(titles.iter())
                    .map(|(k, t)| ((*k).to_owned(), (*t).to_owned()))
                    .collect();
                ((*locale).to_owned(), table)
            })
            .collect();

        Self {
            locales,
            fallback: DEFAULT_LOCALE.to_owned(),
        }
    }

    /// Use `locale` for directories whose locale has no table.
    pub fn with_fallback(mut self, locale: impl Into<String>) -> Self {
        self.fallback = locale.into();
        self
    }

    /// Merge titles over the current tables. New locales and keys are added; existing titles
    /// are replaced.
    pub fn merge(&mut self, overrides: &BTreeMap<String, BTreeMap<String, String>>) {
        for (locale, titles) in overrides {
            let table = self.locales.entry(locale.clone()).or_default();
            for (key, title) in titles {
                table.insert(key.clone(), title.clone());
            }
        }
    }

    /// Name of the fallback locale.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Known locale codes, sorted.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Title for a screenshot key in `locale`.
    ///
    /// Unknown locales use the fallback table; unknown keys yield `""`.
    pub fn title(&self, locale: &str, key: &str) -> &str {
        self.locales
            .get(locale)
            .or_else(|| self.locales.get(&self.fallback))
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Title for a screenshot file in `locale`.
    pub fn title_for_path(&self, path: &Path, locale: &str) -> &str {
        self.title(locale, &screenshot_key(path))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/locale/titles.rs"]
mod tests;
