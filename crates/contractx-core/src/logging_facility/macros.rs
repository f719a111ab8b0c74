//! Operation boundary macros
//!
//! Callers need `contractx_core_types` and `tracing` as dependencies.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)+)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($field)+)?
        )
    };
}

/// Log entry into an operation
///
/// ```
/// # use contractx_core::log_op_start;
/// log_op_start!("create_contract");
/// log_op_start!("create_contract", contract_number = "C-001", contract_version = 2);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            contractx_core_types::schema::EVENT_START
            $(, $($field)+)?
        )
    };
}

/// Log successful completion with its duration
///
/// ```
/// # use contractx_core::log_op_end;
/// log_op_end!("create_contract", duration_ms = 42);
/// log_op_end!("create_contract", duration_ms = 42, contract_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            contractx_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)+)?
        )
    };
}

/// Log failure of an operation
///
/// `$err` is anything convertible into `ExError`; its kind and stable code
/// are logged alongside the rendered message.
///
/// ```
/// # use contractx_core::log_op_error;
/// # use contractx_core::errors::ContractError;
/// log_op_error!("get_contract", ContractError::ContractIdNotFound { id: 7 }, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            contractx_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err = %ex_err
            $(, $($field)+)?
        )
    }};
}
