use serde::de::{Deserialize, Deserializer, Error};
use std::time::Duration;

/// Deserialize a whole, non-zero number of seconds into a [Duration].
pub fn seconds<'a, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'a>,
{
    u64::deserialize(deserializer).and_then(|n| {
        if n == 0 {
            Err(Error::custom("invalid duration: 0 seconds"))
        } else {
            Ok(Duration::from_secs(n))
        }
    })
}

/// As [seconds], for optional fields. Pair with `#[serde(default)]`.
pub fn opt_seconds<'a, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'a>,
{
    seconds(deserializer).map(Some)
}

#[test]
fn test_seconds() {
    #[derive(Debug, PartialEq, Eq, serde::Deserialize)]
    struct T {
        #[serde(deserialize_with = "seconds")]
        val: Duration,
    }

    assert_eq!(
        serde_yaml::from_str::<T>("val: 30").unwrap(),
        T {
            val: Duration::from_secs(30)
        },
    );

    assert!(serde_yaml::from_str::<T>("val: 0").is_err());
    assert!(serde_yaml::from_str::<T>("val: -1").is_err());
    assert!(serde_yaml::from_str::<T>("val: ten").is_err());
}

#[test]
fn test_opt_seconds() {
    #[derive(Debug, PartialEq, Eq, serde::Deserialize)]
    struct T {
        #[serde(default, deserialize_with = "opt_seconds")]
        val: Option<Duration>,
    }

    assert_eq!(
        serde_yaml::from_str::<T>("val: 5").unwrap(),
        T {
            val: Some(Duration::from_secs(5))
        },
    );

    assert_eq!(serde_yaml::from_str::<T>("{}").unwrap(), T { val: None });
}
