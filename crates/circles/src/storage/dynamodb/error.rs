//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to [`TableError`]. Failures where the request may have
//! reached DynamoDB without a readable answer (timeouts, dispatch failures,
//! unparseable responses, internal server errors on writes) become
//! `Indeterminate`, since a transaction may have committed.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::CancellationReason as SdkCancellationReason;

use crate::storage::table::{CancellationReason, TableError};

/// Whether the request may have been applied even though no response was read.
fn outcome_unknown<E, R>(err: &SdkError<E, R>) -> bool {
    matches!(
        err,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_)
    )
}

/// Map a GetItem SDK error to TableError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> TableError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            TableError::Service("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            TableError::Service("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            TableError::Service("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            TableError::Service("DynamoDB internal server error".to_string())
        }
        err => TableError::Service(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to TableError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> TableError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            TableError::Service("Table or index not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            TableError::Service("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            TableError::Service("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            TableError::Service("DynamoDB internal server error".to_string())
        }
        err => TableError::Service(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to TableError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> TableError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            TableError::Service("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            TableError::Service("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            TableError::Service("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            TableError::Service("DynamoDB internal server error".to_string())
        }
        err => TableError::Service(format!("Scan failed: {:?}", err)),
    }
}

/// Map a TransactWriteItems SDK error to TableError.
pub fn map_transact_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> TableError {
    if outcome_unknown(&err) {
        return TableError::Indeterminate(format!("TransactWriteItems got no response: {:?}", err));
    }

    match err.into_service_error() {
        TransactWriteItemsError::TransactionCanceledException(e) => TableError::Cancelled {
            reasons: e
                .cancellation_reasons()
                .iter()
                .map(map_cancellation_reason)
                .collect(),
        },
        TransactWriteItemsError::InternalServerError(_) => {
            TableError::Indeterminate("DynamoDB internal server error".to_string())
        }
        TransactWriteItemsError::TransactionInProgressException(_) => {
            TableError::Service("Transaction already in progress".to_string())
        }
        TransactWriteItemsError::ResourceNotFoundException(_) => {
            TableError::Service("Table not found".to_string())
        }
        TransactWriteItemsError::ProvisionedThroughputExceededException(_) => {
            TableError::Service("Throughput exceeded, please retry".to_string())
        }
        TransactWriteItemsError::RequestLimitExceeded(_) => {
            TableError::Service("Request limit exceeded, please retry".to_string())
        }
        err => TableError::Service(format!("TransactWriteItems failed: {:?}", err)),
    }
}

/// Map one per-item cancellation reason reported by DynamoDB.
pub fn map_cancellation_reason(reason: &SdkCancellationReason) -> CancellationReason {
    match reason.code() {
        None | Some("None") => CancellationReason::None,
        Some("ConditionalCheckFailed") => CancellationReason::ConditionalCheckFailed {
            current: reason.item().cloned(),
        },
        Some("TransactionConflict") => CancellationReason::TransactionConflict,
        Some(code) => CancellationReason::Other(code.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::error::TransactionCanceledException;
    use aws_sdk_dynamodb::types::AttributeValue;

    use super::*;

    #[test]
    fn test_cancellation_reason_codes() {
        let passed = SdkCancellationReason::builder().code("None").build();
        let conflict = SdkCancellationReason::builder()
            .code("TransactionConflict")
            .build();
        let throttled = SdkCancellationReason::builder()
            .code("ThrottlingError")
            .build();

        assert_eq!(map_cancellation_reason(&passed), CancellationReason::None);
        assert_eq!(
            map_cancellation_reason(&conflict),
            CancellationReason::TransactionConflict
        );
        assert_eq!(
            map_cancellation_reason(&throttled),
            CancellationReason::Other("ThrottlingError".to_string())
        );
    }

    #[test]
    fn test_condition_failure_keeps_current_item() {
        let reason = SdkCancellationReason::builder()
            .code("ConditionalCheckFailed")
            .item("pk", AttributeValue::S("circleName#Foo".to_string()))
            .build();

        match map_cancellation_reason(&reason) {
            CancellationReason::ConditionalCheckFailed { current: Some(item) } => {
                assert_eq!(
                    item.get("pk"),
                    Some(&AttributeValue::S("circleName#Foo".to_string()))
                );
            }
            other => panic!("unexpected reason: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_transaction_keeps_reason_order() {
        let exception = TransactionCanceledException::builder()
            .cancellation_reasons(SdkCancellationReason::builder().code("None").build())
            .cancellation_reasons(
                SdkCancellationReason::builder()
                    .code("ConditionalCheckFailed")
                    .build(),
            )
            .build();
        let err: SdkError<TransactWriteItemsError, ()> = SdkError::service_error(
            TransactWriteItemsError::TransactionCanceledException(exception),
            (),
        );

        assert_eq!(
            map_transact_write_error(err),
            TableError::Cancelled {
                reasons: vec![
                    CancellationReason::None,
                    CancellationReason::ConditionalCheckFailed { current: None },
                ],
            }
        );
    }

    #[test]
    fn test_timeout_is_indeterminate() {
        let err: SdkError<TransactWriteItemsError, ()> =
            SdkError::timeout_error("deadline elapsed");

        assert!(matches!(
            map_transact_write_error(err),
            TableError::Indeterminate(_)
        ));
    }
}
