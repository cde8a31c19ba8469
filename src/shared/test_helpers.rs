use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

/// GPS tags to embed in a test image: `(lat DMS, lat ref, lon DMS, lon ref)`
pub type TestGps = ([(u32, u32); 3], &'static str, [(u32, u32); 3], &'static str);

/// Istanbul, Galata Tower: 41°1'33.6"N 28°58'27.6"E
pub const GALATA_GPS: TestGps = (
    [(41, 1), (1, 1), (336, 10)],
    "N",
    [(28, 1), (58, 1), (276, 10)],
    "E",
);

fn field(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

fn ascii(s: &str) -> Value {
    Value::Ascii(vec![s.as_bytes().to_vec()])
}

fn rationals(dms: [(u32, u32); 3]) -> Value {
    Value::Rational(
        dms.iter()
            .map(|&(num, denom)| Rational { num, denom })
            .collect(),
    )
}

/// Build a minimal TIFF carrying the given GPS and timestamp tags
pub fn tiff_with_exif(
    gps: Option<TestGps>,
    datetime_original: Option<&str>,
    datetime: Option<&str>,
) -> Vec<u8> {
    let mut fields = vec![field(Tag::ImageDescription, ascii("test image"))];

    if let Some((lat, lat_ref, lon, lon_ref)) = gps {
        fields.push(field(Tag::GPSLatitudeRef, ascii(lat_ref)));
        fields.push(field(Tag::GPSLatitude, rationals(lat)));
        fields.push(field(Tag::GPSLongitudeRef, ascii(lon_ref)));
        fields.push(field(Tag::GPSLongitude, rationals(lon)));
    }
    if let Some(dt) = datetime_original {
        fields.push(field(Tag::DateTimeOriginal, ascii(dt)));
    }
    if let Some(dt) = datetime {
        fields.push(field(Tag::DateTime, ascii(dt)));
    }

    let mut writer = Writer::new();
    for f in &fields {
        writer.push_field(f);
    }

    let mut buf = Cursor::new(Vec::new());
    writer
        .write(&mut buf, false)
        .expect("failed to write test TIFF");
    buf.into_inner()
}
