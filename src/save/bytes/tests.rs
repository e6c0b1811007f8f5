use quickcheck_macros::quickcheck;

use super::{Cursor, Writer};
use crate::save::SaveError;

#[quickcheck]
fn i8_roundtrip(value: i8) -> bool {
	let mut writer = Writer::new();
	writer.write_i8(value);
	Cursor::new(writer.as_bytes()).read_i8().ok() == Some(value)
}

#[quickcheck]
fn u16_i16_roundtrip(unsigned: u16, signed: i16) -> bool {
	let mut writer = Writer::new();
	writer.write_u16(unsigned);
	writer.write_i16(signed);
	let mut cursor = Cursor::new(writer.as_bytes());
	cursor.read_u16().ok() == Some(unsigned) && cursor.read_i16().ok() == Some(signed) && cursor.remaining() == 0
}

#[quickcheck]
fn u32_i32_roundtrip(unsigned: u32, signed: i32) -> bool {
	let mut writer = Writer::new();
	writer.write_u32(unsigned);
	writer.write_i32(signed);
	let mut cursor = Cursor::new(writer.as_bytes());
	cursor.read_u32().ok() == Some(unsigned) && cursor.read_i32().ok() == Some(signed)
}

#[quickcheck]
fn u64_i64_roundtrip(unsigned: u64, signed: i64) -> bool {
	let mut writer = Writer::new();
	writer.write_u64(unsigned);
	writer.write_i64(signed);
	let mut cursor = Cursor::new(writer.as_bytes());
	cursor.read_u64().ok() == Some(unsigned) && cursor.read_i64().ok() == Some(signed)
}

#[quickcheck]
fn float_bits_roundtrip(single: f32, double: f64) -> bool {
	let mut writer = Writer::new();
	writer.write_f32(single);
	writer.write_f64(double);
	let mut cursor = Cursor::new(writer.as_bytes());
	let (Ok(a), Ok(b)) = (cursor.read_f32(), cursor.read_f64()) else {
		return false;
	};
	a.to_bits() == single.to_bits() && b.to_bits() == double.to_bits()
}

#[quickcheck]
fn string_roundtrip(text: String) -> bool {
	let mut writer = Writer::new();
	if writer.write_string(Some(text.as_str()), "s").is_err() {
		return false;
	}
	let mut cursor = Cursor::new(writer.as_bytes());
	cursor.read_string().ok() == Some(Some(text)) && cursor.remaining() == 0
}

#[test]
fn integers_are_little_endian() {
	let mut writer = Writer::new();
	writer.write_u32(0x0403_0201);
	writer.write_i16(-2);
	assert_eq!(writer.as_bytes(), &[1, 2, 3, 4, 0xFE, 0xFF]);
}

#[test]
fn strings_roundtrip_with_length_prefix() {
	for text in ["", "Minion", "Ünïcødé ✓ 氧气"] {
		let mut writer = Writer::new();
		writer.write_string(Some(text), "s").expect("string writes");
		let bytes = writer.into_bytes();
		assert_eq!(&bytes[..4], &(text.len() as i32).to_le_bytes());
		assert_eq!(bytes.len(), 4 + text.len());

		let mut cursor = Cursor::new(&bytes);
		assert_eq!(cursor.read_string().expect("string reads").as_deref(), Some(text));
		assert_eq!(cursor.remaining(), 0);
	}
}

#[test]
fn null_string_uses_minus_one_marker() {
	let mut writer = Writer::new();
	writer.write_string(None, "s").expect("null writes");
	assert_eq!(writer.as_bytes(), &(-1_i32).to_le_bytes());
	assert_eq!(Cursor::new(writer.as_bytes()).read_string().expect("null reads"), None);
}

#[test]
fn negative_string_length_is_rejected() {
	let bytes = (-5_i32).to_le_bytes();
	let err = Cursor::new(&bytes).read_string().expect_err("negative length must fail");
	assert!(matches!(err, SaveError::InvalidLength { len: -5, at: 0, .. }));
}

#[test]
fn invalid_utf8_is_rejected() {
	let mut bytes = 2_i32.to_le_bytes().to_vec();
	bytes.extend_from_slice(&[0xC3, 0x28]);
	let err = Cursor::new(&bytes).read_string().expect_err("bad utf-8 must fail");
	assert!(matches!(err, SaveError::InvalidUtf8 { at: 4 }));
}

#[test]
fn read_past_end_reports_offset_and_size() {
	let bytes = [1_u8, 2, 3, 4, 5, 6];
	let mut cursor = Cursor::new(&bytes);
	cursor.read_u32().expect("first read fits");
	let err = cursor.read_u32().expect_err("second read overflows");
	assert!(matches!(err, SaveError::OutOfData { at: 4, need: 4, rem: 2 }));
	assert_eq!(cursor.pos(), 4, "failed read must not advance");
}

#[test]
fn truncated_string_payload_fails() {
	let mut bytes = 10_i32.to_le_bytes().to_vec();
	bytes.extend_from_slice(b"abc");
	let err = Cursor::new(&bytes).read_string().expect_err("payload short");
	assert!(matches!(err, SaveError::OutOfData { at: 4, need: 10, rem: 3 }));
}

#[test]
fn reserved_length_counts_bytes_after_slot() {
	let mut writer = Writer::new();
	writer.write_u8(0xAA);
	let mark = writer.reserve_len();
	writer.write_u64(7);
	writer.write_u8(1);
	let len = writer.finish_len(mark, "region").expect("length fits");
	assert_eq!(len, 9);
	assert_eq!(&writer.as_bytes()[1..5], &9_i32.to_le_bytes());
}
