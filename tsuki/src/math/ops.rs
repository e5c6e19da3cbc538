// Component-wise operator generators shared by the vector-like types.

macro_rules! impl_index {
    ( $type:ident [ $( $i:literal => $c:ident ),+ ] ) => {
        impl<T> std::ops::Index<usize> for $type<T>
        where
            T: ValueType,
        {
            type Output = T;

            #[inline]
            fn index(&self, i: usize) -> &T {
                match i {
                    $($i => &self.$c,)*
                    _ => panic!("{}: Out of bounds access {}", stringify!($type), i),
                }
            }
        }

        impl<T> std::ops::IndexMut<usize> for $type<T>
        where
            T: ValueType,
        {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut T {
                match i {
                    $($i => &mut self.$c,)*
                    _ => panic!("{}: Out of bounds access {}", stringify!($type), i),
                }
            }
        }
    };
}

macro_rules! impl_binop {
    ( $trait:ident $fn:ident $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> std::ops::$trait for $type<T>
        where
            T: ValueType,
        {
            type Output = Self;

            #[inline]
            fn $fn(self, other: Self) -> Self {
                debug_assert!(!self.has_nans());
                debug_assert!(!other.has_nans());

                Self {
                    $($c: self.$c.$fn(other.$c),)*
                }
            }
        }
    };
}

macro_rules! impl_assign_op {
    ( $trait:ident $fn:ident $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> std::ops::$trait for $type<T>
        where
            T: ValueType,
        {
            #[inline]
            fn $fn(&mut self, other: Self) {
                debug_assert!(!other.has_nans());

                $(self.$c.$fn(other.$c);)*
            }
        }
    };
}

macro_rules! impl_scalar_op {
    ( $trait:ident $fn:ident $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> std::ops::$trait<T> for $type<T>
        where
            T: ValueType,
        {
            type Output = Self;

            #[inline]
            fn $fn(self, s: T) -> Self {
                debug_assert!(!self.has_nans());

                Self {
                    $($c: self.$c.$fn(s),)*
                }
            }
        }
    };
}

macro_rules! impl_scalar_assign_op {
    ( $trait:ident $fn:ident $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> std::ops::$trait<T> for $type<T>
        where
            T: ValueType,
        {
            #[inline]
            fn $fn(&mut self, s: T) {
                $(self.$c.$fn(s);)*
            }
        }
    };
}

macro_rules! impl_neg {
    ( $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> std::ops::Neg for $type<T>
        where
            T: ValueType + std::ops::Neg<Output = T>,
        {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    $($c: -self.$c,)*
                }
            }
        }
    };
}

macro_rules! impl_approx {
    ( $type:ident [ $( $c:ident )+ ] ) => {
        impl<T> approx::AbsDiffEq for $type<T>
        where
            T: ValueType + approx::AbsDiffEq<Epsilon = T>,
        {
            type Epsilon = T;

            fn default_epsilon() -> T {
                T::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
                $(self.$c.abs_diff_eq(&other.$c, epsilon))&&*
            }
        }

        impl<T> approx::RelativeEq for $type<T>
        where
            T: ValueType + approx::RelativeEq<Epsilon = T>,
        {
            fn default_max_relative() -> T {
                T::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
                $(self.$c.relative_eq(&other.$c, epsilon, max_relative))&&*
            }
        }
    };
}

/// Implements the common constructors and component-wise operators for a vector-like type.
macro_rules! impl_vec_like {
    ( $type:ident [ $( $i:literal => $c:ident ),+ ] ) => {
        impl<T> $type<T>
        where
            T: ValueType,
        {
            /// Constructs a new value.
            ///
            /// Has a debug assert that checks for NaNs.
            #[inline]
            pub fn new($($c: T),*) -> Self {
                let v = Self { $($c),* };
                debug_assert!(!v.has_nans());
                v
            }

            /// Constructs a new value of 0s.
            #[inline]
            pub fn zeros() -> Self {
                Self {
                    $($c: T::zero(),)*
                }
            }

            /// Constructs a new value of 1s.
            #[inline]
            pub fn ones() -> Self {
                Self {
                    $($c: T::one(),)*
                }
            }

            /// Returns `true` if any component is NaN.
            // Not all T have is_nan()
            #[allow(clippy::eq_op)]
            #[inline]
            pub fn has_nans(&self) -> bool {
                $(self.$c != self.$c)||*
            }

            /// Returns the component-wise minimum.
            #[inline]
            pub fn min(&self, other: Self) -> Self {
                Self {
                    $($c: self.$c.mini(other.$c),)*
                }
            }

            /// Returns the component-wise maximum.
            #[inline]
            pub fn max(&self, other: Self) -> Self {
                Self {
                    $($c: self.$c.maxi(other.$c),)*
                }
            }
        }

        impl<T> From<T> for $type<T>
        where
            T: ValueType,
        {
            fn from(v: T) -> Self {
                Self {
                    $($c: v,)*
                }
            }
        }

        impl_index!($type [ $( $i => $c ),+ ]);
        impl_scalar_op!(Mul mul $type [ $( $c )+ ]);
        impl_scalar_op!(Div div $type [ $( $c )+ ]);
        impl_scalar_assign_op!(MulAssign mul_assign $type [ $( $c )+ ]);
        impl_scalar_assign_op!(DivAssign div_assign $type [ $( $c )+ ]);
        impl_neg!($type [ $( $c )+ ]);
        impl_approx!($type [ $( $c )+ ]);
    };
}
