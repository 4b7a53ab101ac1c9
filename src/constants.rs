//! Module for shared constants used across the codebase

/// Maximum sizes accepted when loading files
pub mod limits {
    /// Plain text inputs (case converter, formatter, JSON, todos...)
    pub const MAX_TEXT_BYTES: u64 = 100_000;
    /// Small configuration files (e.g. a password loaded from disk)
    pub const MAX_CONFIG_BYTES: u64 = 10_000;
    /// Settings files such as `min,max,quantity` for the random generator
    pub const MAX_SETTINGS_BYTES: u64 = 1_000;
    /// Images handled by the raster canvas
    pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
}

pub mod number {
    pub const DEFAULT_DECIMAL_PLACES: u8 = 2;
    pub const MAX_DECIMAL_PLACES: u8 = 8;
    pub const CURRENCY_SYMBOL: &str = "$";
}

pub mod password {
    pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
    pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const DIGITS: &str = "0123456789";
    pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
    pub const DEFAULT_LENGTH: usize = 16;
    pub const MIN_LENGTH: usize = 4;
    pub const MAX_LENGTH: usize = 128;
}

pub mod uuid {
    pub const MAX_COUNT: usize = 100;
    pub const DEFAULT_COUNT: usize = 5;
}

pub mod random {
    pub const MAX_QUANTITY: usize = 1000;
    pub const HISTORY_SIZE: usize = 5;
}

pub mod color {
    pub const HISTORY_SIZE: usize = 10;
}

pub mod gradient {
    pub const DEFAULT_ANGLE: u16 = 90;
    pub const MIN_STOPS: usize = 2;
    pub const MAX_STOPS: usize = 8;
    /// Exported gradient configurations
    pub const MAX_CONFIG_BYTES: u64 = 5_000;
}

pub mod qr {
    pub const DEFAULT_SIZE: u32 = 200;
    pub const MIN_SIZE: u32 = 100;
    pub const MAX_SIZE: u32 = 500;
    /// Quiet zone, in modules
    pub const DEFAULT_MARGIN: u32 = 1;
    pub const MAX_MARGIN: u32 = 5;
    /// Pixels per module when the requested size is smaller than the code
    pub const FALLBACK_SCALE: u32 = 4;
    pub const DEFAULT_DARK: &str = "#000000";
    pub const DEFAULT_LIGHT: &str = "#ffffff";
}

pub mod avatar {
    pub const DEFAULT_SIZE: u32 = 300;
    pub const MIN_SIZE: u32 = 50;
    pub const MAX_SIZE: u32 = 500;
    pub const DEFAULT_FONT_SIZE: u32 = 120;
    pub const MIN_FONT_SIZE: u32 = 12;
    pub const MAX_FONT_SIZE: u32 = 144;
    pub const DEFAULT_BACKGROUND: (u8, u8, u8) = (0x3b, 0x82, 0xf6);
    /// Families tried in order before falling back to any installed face
    pub const FONT_FAMILIES: [&str; 5] = ["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans", "Noto Sans"];
}

pub mod network {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_RETRIES: u32 = 1;
    pub const JOKE_URL: &str = "https://icanhazdadjoke.com/";
    pub const GENERATIVE_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
    pub const API_KEY_ENV: &str = "TOOLSHED_API_KEY";
}

/// Sample corpus used by the placeholder text generator
pub mod lorem {
    pub const WORDS: [&str; 19] = [
        "lorem",
        "ipsum",
        "dolor",
        "sit",
        "amet",
        "consectetur",
        "adipiscing",
        "elit",
        "sed",
        "do",
        "eiusmod",
        "tempor",
        "incididunt",
        "ut",
        "labore",
        "et",
        "dolore",
        "magna",
        "aliqua",
    ];

    pub const SENTENCES: [&str; 5] = [
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
        "Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.",
        "Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris.",
        "Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore.",
        "Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.",
    ];

    pub const PARAGRAPHS: [&str; 3] = [
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.",
        "Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.",
        "Sed ut perspiciatis unde omnis iste natus error sit voluptatem accusantium doloremque laudantium, totam rem aperiam, eaque ipsa quae ab illo inventore veritatis et quasi architecto beatae vitae dicta sunt explicabo.",
    ];

    /// Prefix removed from the first sentence/paragraph when not starting with "Lorem ipsum"
    pub const OPENER: &str = "Lorem ipsum ";
}
