/// Implements [`ZodType`](crate::ZodType) and [`ZodSchema`](crate::ZodSchema)
/// for a schema struct.
///
/// The struct's last generic parameter must be its constraint `C`, it must
/// carry `internals` and `_mode` fields, and it must provide an inherent
/// `run(&self, Source<'_, Base>, &ParseContext) -> Parsed<C::Out<Base>>`.
/// Every other field is listed in `fields` so the constraint can be swapped.
macro_rules! zod_schema {
    (
        $name:ident [$($p:ident),*],
        base = $base:ty,
        fields = [$($field:ident),*]
        $(, where $($bound:tt)+)?
    ) => {
        impl<$($p,)* C: $crate::constraint::Constraint> $crate::schema::ZodType
            for $name<$($p,)* C>
        $(where $($bound)+)?
        {
            type Output = <C as $crate::constraint::Constraint>::Out<$base>;

            fn parse_input(
                &self,
                input: Option<&$crate::value::Value>,
                ctx: &$crate::config::ParseContext,
            ) -> $crate::engine::Parsed<Self::Output> {
                self.run($crate::engine::Source::from(input), ctx)
            }

            fn literal_values(&self) -> Option<Vec<$crate::value::Value>> {
                self.internals.values.clone()
            }
        }

        impl<$($p,)* C: $crate::constraint::Constraint> $crate::schema::ZodSchema
            for $name<$($p,)* C>
        $(where $($bound)+)?
        {
            type Base = $base;
            type Mode = C;
            type Retyped<M: $crate::constraint::Constraint> = $name<$($p,)* M>;

            fn internals(&self) -> &$crate::internals::Internals<$base> {
                &self.internals
            }

            fn internals_mut(&mut self) -> &mut $crate::internals::Internals<$base> {
                &mut self.internals
            }

            fn retype<M: $crate::constraint::Constraint>(self) -> $name<$($p,)* M> {
                $name {
                    internals: self.internals,
                    $($field: self.$field,)*
                    _mode: ::std::marker::PhantomData,
                }
            }

            fn parse_owned(
                &self,
                value: Option<$base>,
                ctx: &$crate::config::ParseContext,
            ) -> $crate::engine::Parsed<Self::Output> {
                self.run($crate::engine::Source::Owned(value), ctx)
            }
        }
    };
}
