pub const LABEL_APP: &str = "app";
pub const LABEL_APP_INSTALLER: &str = "installer";

pub fn label_selector<'a, L: IntoIterator<Item = (&'a str, &'a str)>>(labels: L) -> String {
    labels
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn installer_pod_selector() -> String {
    label_selector([(LABEL_APP, LABEL_APP_INSTALLER)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installer_pod_selector() {
        assert_eq!(installer_pod_selector(), "app=installer");
    }

    #[test]
    fn test_label_selector_joins_pairs() {
        assert_eq!(
            label_selector([("app", "installer"), ("revision", "7")]),
            "app=installer,revision=7"
        );
        assert_eq!(label_selector(Vec::<(&str, &str)>::new()), "");
    }
}
