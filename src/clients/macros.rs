/// Lookup by id. A missing document becomes `NotFound` instead of `Ok(None)`.
#[macro_export]
macro_rules! impl_client_get {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: String,
                ) -> Result<$entity, $crate::error::BookstoreError> {
                    tracing::debug!("Sending request");
                    self.inner.get(id.clone()).await?.ok_or_else(|| {
                        $crate::error::BookstoreError::NotFound {
                            kind: <$entity as $crate::actor_framework::Entity>::KIND,
                            id,
                        }
                    })
                }
            }
        }
    };
}

/// Plain removal by id, for documents whose deletion has no side effects.
#[macro_export]
macro_rules! impl_client_delete {
    ($client_name:ident, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $entity_name_snake>](
                    &self,
                    id: String,
                ) -> Result<(), $crate::error::BookstoreError> {
                    tracing::debug!("Sending request");
                    self.inner.delete(id).await.map(|_| ())
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident) => {
        $crate::impl_client_get!($client_name, $entity, $entity_name_snake);
        $crate::impl_client_delete!($client_name, $entity_name_snake);
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

/// Stops the store actor behind the client.
#[macro_export]
macro_rules! impl_client_shutdown {
    ($client_name:ident) => {
        impl $client_name {
            pub async fn shutdown(&self) -> Result<(), $crate::error::BookstoreError> {
                self.inner.shutdown().await
            }
        }
    };
}

#[macro_export]
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $entity_name_snake:ident) => {
        $crate::impl_client_new!($client_name, $entity);
        $crate::impl_client_methods!($client_name, $entity, $entity_name_snake);
        $crate::impl_client_shutdown!($client_name);
    };
}
