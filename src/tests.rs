#[cfg(test)]
mod tests {

    mod media_model_tests {
        use crate::models::{MediaRecord, MediaType, NewMedia, SelectedFile};

        #[test]
        fn test_media_type_from_mime() {
            assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Image));
            assert_eq!(MediaType::from_mime("image/svg+xml"), Some(MediaType::Image));
            assert_eq!(MediaType::from_mime("video/mp4"), Some(MediaType::Video));
            assert_eq!(MediaType::from_mime("video/webm"), Some(MediaType::Video));
        }

        #[test]
        fn test_media_type_rejects_other_mimes() {
            assert_eq!(MediaType::from_mime("audio/mpeg"), None);
            assert_eq!(MediaType::from_mime("application/pdf"), None);
            assert_eq!(MediaType::from_mime("image"), None);
            assert_eq!(MediaType::from_mime(""), None);
        }

        #[test]
        fn test_media_type_display() {
            assert_eq!(MediaType::Image.to_string(), "image");
            assert_eq!(MediaType::Video.to_string(), "video");
        }

        #[test]
        fn test_record_reads_store_row() {
            let row: MediaRecord = serde_json::from_str(
                r#"{
                    "id": 42,
                    "title": "Sunset",
                    "type": "video",
                    "cloudinary_url": "https://res.example.com/v.mp4",
                    "cloudinary_public_id": "v",
                    "created_at": "2024-05-01T10:00:00.123456+00:00"
                }"#,
            )
            .unwrap();
            assert_eq!(row.id, 42);
            assert_eq!(row.media_type, MediaType::Video);
            assert!(row.is_video());
        }

        #[test]
        fn test_record_rejects_unknown_type() {
            let result: Result<MediaRecord, _> = serde_json::from_str(
                r#"{"id":1,"title":"x","type":"audio","cloudinary_url":"u","cloudinary_public_id":"p","created_at":"c"}"#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn test_new_media_has_only_client_columns() {
            let payload = serde_json::to_value(NewMedia {
                title: "t1".to_string(),
                media_type: MediaType::Image,
                cloudinary_url: "https://res.example.com/a.png".to_string(),
                cloudinary_public_id: "a".to_string(),
            })
            .unwrap();

            let keys: Vec<&str> = payload
                .as_object()
                .unwrap()
                .keys()
                .map(|k| k.as_str())
                .collect();
            assert_eq!(
                keys,
                ["cloudinary_public_id", "cloudinary_url", "title", "type"]
            );
            assert_eq!(payload["type"], "image");
        }

        #[test]
        fn test_selected_file_debug_hides_bytes() {
            let file = SelectedFile::new("a.png", "image/png", vec![7u8; 1024]);
            let debug = format!("{:?}", file);
            assert!(debug.contains("size_bytes: 1024"));
            assert!(!debug.contains("7, 7"));
        }
    }

    mod error_tests {
        use crate::GalleryError;

        #[test]
        fn test_display_is_the_bare_message() {
            let err = GalleryError::Upload("Upload preset not found".to_string());
            assert_eq!(err.to_string(), "Upload preset not found");
        }

        #[test]
        fn test_kinds() {
            assert_eq!(GalleryError::Validation(String::new()).kind(), "validation");
            assert_eq!(GalleryError::Insert(String::new()).kind(), "insert");
            assert!(!GalleryError::Validation(String::new()).is_remote());
            assert!(GalleryError::Query(String::new()).is_remote());
        }
    }

    mod pagination_property_tests {
        use crate::services::pagination::{clamp_page, total_pages, PageRange, PAGE_SIZE};

        #[test]
        fn test_every_page_range_is_contiguous() {
            for page in 1..50u32 {
                let current = PageRange::for_page(page, PAGE_SIZE).unwrap();
                let next = PageRange::for_page(page + 1, PAGE_SIZE).unwrap();
                assert_eq!(current.to + 1, next.from);
            }
        }

        #[test]
        fn test_clamped_page_never_exceeds_total() {
            for total in 0..40u64 {
                let pages = total_pages(total, PAGE_SIZE);
                for requested in -3..10i64 {
                    let page = clamp_page(requested, pages);
                    assert!(page >= 1);
                    assert!(page <= pages.max(1));
                }
            }
        }
    }
}
