//! Resolved method bindings: the bridge from a plain function to a uniform,
//! shape-erased repository method.
//!
//! A binding is computed once, when the method is registered, and is
//! immutable afterwards: the declared parameter kinds for shape validation,
//! plus an erased closure that extracts each argument from the call context
//! and delegates to the original function.

use crate::error::RepositoryError;
use crate::repository::args::{CallContext, OperationArg, ParamKind};

type InvokeFn<T, I, R> =
    Box<dyn Fn(&mut CallContext<'_, T, I>) -> Result<R, RepositoryError> + Send + Sync>;

/// One registered repository method: its declared shape and how to call it.
pub struct MethodBinding<T, I, R> {
    params: Vec<ParamKind>,
    invoke: InvokeFn<T, I, R>,
}

impl<T, I, R> MethodBinding<T, I, R> {
    /// The declared parameter kinds, in declaration order.
    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }

    pub(crate) fn call(&self, cx: &mut CallContext<'_, T, I>) -> Result<R, RepositoryError> {
        (self.invoke)(cx)
    }
}

/// Conversion of a function into a [`MethodBinding`].
///
/// Implemented for `Fn` items and closures of up to six [`OperationArg`]
/// parameters returning `Result<R, E>`; a failing method surfaces as
/// [`RepositoryError::Invocation`] with its error preserved as the source.
/// Infallible methods use [`std::convert::Infallible`] for `E`.
pub trait IntoMethodBinding<T, I, A, R> {
    /// Record the declared shape and erase the call.
    fn into_binding(self) -> MethodBinding<T, I, R>;
}

macro_rules! impl_into_method_binding {
    ($(($ty:ident, $var:ident)),*) => {
        impl<T, I, R, E, F, $($ty),*> IntoMethodBinding<T, I, ($($ty,)*), R> for F
        where
            T: 'static,
            I: 'static,
            R: 'static,
            E: std::error::Error + Send + Sync + 'static,
            F: Fn($($ty),*) -> std::result::Result<R, E> + Send + Sync + 'static,
            $($ty: OperationArg<T, I>,)*
        {
            fn into_binding(self) -> MethodBinding<T, I, R> {
                MethodBinding {
                    params: vec![$(<$ty as OperationArg<T, I>>::kind()),*],
                    invoke: Box::new(move |cx| {
                        $(let $var = <$ty as OperationArg<T, I>>::extract(cx)?;)*
                        self($($var),*).map_err(|source| RepositoryError::Invocation {
                            operation: cx.operation,
                            resource_type: cx.resource_type,
                            source: Box::new(source),
                        })
                    }),
                }
            }
        }
    };
}

impl_into_method_binding!();
impl_into_method_binding!((A1, a1));
impl_into_method_binding!((A1, a1), (A2, a2));
impl_into_method_binding!((A1, a1), (A2, a2), (A3, a3));
impl_into_method_binding!((A1, a1), (A2, a2), (A3, a3), (A4, a4));
impl_into_method_binding!((A1, a1), (A2, a2), (A3, a3), (A4, a4), (A5, a5));
impl_into_method_binding!((A1, a1), (A2, a2), (A3, a3), (A4, a4), (A5, a5), (A6, a6));
