use lazy_static::lazy_static;
use std::collections::HashSet;

/// Multipart field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

/// Placeholder for address fields missing from the geocoding response
pub const UNKNOWN: &str = "Bilinmiyor";

lazy_static! {
    /// Lowercase file extensions accepted for upload
    pub static ref ALLOWED_EXTENSIONS: HashSet<&'static str> =
        ["png", "jpg", "jpeg", "gif", "bmp", "tiff"].into_iter().collect();
}

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const MSG_NO_FILE: &str = "Dosya yüklenmedi.";

pub const MSG_EMPTY_FILENAME: &str = "Lütfen önce bir fotoğraf seçiniz.";

pub const MSG_INVALID_FORMAT: &str = "Geçerli bir fotoğraf formatı seçiniz (JPG, PNG, GIF, vb.).";

pub const MSG_FILE_TOO_LARGE: &str = "Dosya boyutu çok büyük.";

pub const MSG_SAVE_FAILED: &str = "Dosya kaydedilirken hata oluştu.";

pub const MSG_NO_GPS: &str = "Bu fotoğraf GPS verisi içermiyor. Lütfen GPS özelliği açık olan bir cihazla çekilmiş fotoğraf seçiniz.";

pub const MSG_GEOCODING_FAILED: &str =
    "Konum bilgileri alınırken hata oluştu. Lütfen internet bağlantınızı kontrol edin.";

pub const MSG_NOT_FOUND: &str = "Sayfa bulunamadı.";

pub const MSG_SERVER_ERROR: &str = "Sunucu hatası oluştu.";
