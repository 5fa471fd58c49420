use review_models::{Review, SEED_VERSION};
use std::io::Read;
use std::path::Path;
use tracing::info;
use crate::error::{ReviewError, ReviewResult};
use crate::query::validate_review;

/// Read a seed file, choosing the format from its extension (`.json` or `.csv`)
pub fn load_seed_file(path: &Path) -> ReviewResult<Vec<Review>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let reviews = match extension.as_deref() {
        Some("json") => parse_seed_json(&std::fs::read_to_string(path)?)?,
        Some("csv") => parse_seed_csv(std::fs::File::open(path)?)?,
        _ => {
            return Err(ReviewError::validation(format!(
                "unsupported seed file {:?}: expected .json or .csv",
                path
            )))
        }
    };
    info!("Read {} seed reviews from {:?}", reviews.len(), path);
    Ok(reviews)
}

/// Parse a JSON array of review records
pub fn parse_seed_json(content: &str) -> ReviewResult<Vec<Review>> {
    let records: Vec<Review> = serde_json::from_str(content)
        .map_err(|e| ReviewError::validation(format!("invalid seed JSON: {}", e)))?;
    normalize(records)
}

/// Parse CSV with a `movieId,reviewerName,reviewDate,rating,content` header
pub fn parse_seed_csv<R: Read>(reader: R) -> ReviewResult<Vec<Review>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut records = Vec::new();
    for (index, result) in csv_reader.deserialize::<Review>().enumerate() {
        let record = result
            .map_err(|e| ReviewError::validation(format!("invalid seed CSV row {}: {}", index + 1, e)))?;
        records.push(record);
    }
    normalize(records)
}

/// Validate every record and stamp it with the seed version
fn normalize(records: Vec<Review>) -> ReviewResult<Vec<Review>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, mut review)| {
            validate_review(&review).map_err(|e| {
                ReviewError::validation(format!("seed record {}: {}", index + 1, e))
            })?;
            review.version = SEED_VERSION;
            Ok(review)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_seed_json() {
        let json = r#"[
            {"movieId": 101, "reviewerName": "alice", "reviewDate": "2020-01-01", "rating": 8, "content": "Loved it."},
            {"movieId": 101, "reviewerName": "bob", "reviewDate": "2020-06-01", "rating": 3, "content": "Dull.", "version": 7}
        ]"#;
        let reviews = parse_seed_json(json).unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.version == SEED_VERSION));
        assert_eq!(reviews[1].reviewer_name, "bob");
    }

    #[test]
    fn test_parse_seed_csv_with_quoted_content() {
        let csv = "movieId,reviewerName,reviewDate,rating,content\n\
                   101,alice,2020-01-01,8,\"Tense, clever, and short.\"\n\
                   102,bob,2021-03-04,5,Fine\n";
        let reviews = parse_seed_csv(csv.as_bytes()).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].content, "Tense, clever, and short.");
        assert_eq!(reviews[1].review_date.to_string(), "2021-03-04");
    }

    #[test]
    fn test_invalid_record_rejects_file() {
        let json = r#"[{"movieId": 101, "reviewerName": "alice", "reviewDate": "2020-01-01", "rating": 12, "content": "x"}]"#;
        let err = parse_seed_json(json).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("seed record 1"));

        let bad_date = r#"[{"movieId": 1, "reviewerName": "a", "reviewDate": "01/02/2020", "rating": 5, "content": "x"}]"#;
        assert!(parse_seed_json(bad_date).is_err());
    }

    #[test]
    fn test_load_seed_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "movieId,reviewerName,reviewDate,rating,content").unwrap();
        writeln!(file, "7,carol,2019-12-31,9,Great").unwrap();
        let reviews = load_seed_file(file.path()).unwrap();
        assert_eq!(reviews[0].movie_id, 7);

        let other = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(load_seed_file(other.path()).is_err());
    }
}
