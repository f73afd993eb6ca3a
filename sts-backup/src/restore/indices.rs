//! Classification of the indices that belong to the managed dataset.

/// Every index whose name starts with `managed_prefix` or `data_stream_prefix`,
/// in input order.
pub fn select_managed(
    all_indices: &[String],
    managed_prefix: &str,
    data_stream_prefix: &str,
) -> Vec<String> {
    all_indices
        .iter()
        .filter(|index| index.starts_with(managed_prefix) || index.starts_with(data_stream_prefix))
        .cloned()
        .collect()
}

/// True if any index is a rolled backing index of the data stream.
///
/// Only `<prefix>-...` counts; an index named exactly like the stream does not.
pub fn has_data_stream_members(indices: &[String], data_stream_prefix: &str) -> bool {
    let member_prefix = format!("{}-", data_stream_prefix);
    indices.iter().any(|index| index.starts_with(&member_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_managed_keeps_prefixed_indices_in_order() {
        let all = names(&[
            "sts_topology",
            "sts_metrics",
            "sts_k8s_logs-000001",
            "other_index",
        ]);

        let managed = select_managed(&all, "sts_", "sts_k8s_logs");
        assert_eq!(
            managed,
            names(&["sts_topology", "sts_metrics", "sts_k8s_logs-000001"])
        );
    }

    #[test]
    fn test_select_managed_matches_either_prefix() {
        let all = names(&[".ds-logs-000002", "logs", "sts_a", "metrics", ".ds-logs-000001"]);

        let managed = select_managed(&all, "sts_", ".ds-logs");
        assert_eq!(managed, names(&[".ds-logs-000002", "sts_a", ".ds-logs-000001"]));
    }

    #[test]
    fn test_select_managed_empty_input() {
        assert!(select_managed(&[], "sts_", "sts_k8s_logs").is_empty());
    }

    #[test]
    fn test_select_managed_no_matches() {
        let all = names(&["kibana", "other_index"]);
        assert!(select_managed(&all, "sts_", "sts_k8s_logs").is_empty());
    }

    #[rstest]
    #[case(&["sts_k8s_logs"], false)]
    #[case(&["sts_k8s_logs-000001"], true)]
    #[case(&["sts_topology", "sts_k8s_logs-2025.01.01-000003"], true)]
    #[case(&["sts_k8s_logsX"], false)]
    #[case(&[], false)]
    fn test_has_data_stream_members(#[case] indices: &[&str], #[case] expected: bool) {
        assert_eq!(has_data_stream_members(&names(indices), "sts_k8s_logs"), expected);
    }
}
