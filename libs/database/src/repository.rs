use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};

/// Generic repository wrapping common SeaORM operations for a single entity.
///
/// Domain repositories hold one of these and delegate the boring CRUD parts
/// to it, keeping domain-specific queries (filters, joins) in the domain crate.
///
/// # Example
///
/// ```ignore
/// pub struct PgTaskRepository {
///     base: BaseRepository<entity::Entity>,
/// }
///
/// impl PgTaskRepository {
///     pub fn new(db: DatabaseConnection) -> Self {
///         Self { base: BaseRepository::new(db) }
///     }
/// }
/// ```
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: std::marker::PhantomData<E>,
}

impl<E: EntityTrait> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: std::marker::PhantomData,
        }
    }

    /// Access the underlying connection for domain-specific queries.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a new row and return the stored model.
    pub async fn insert<A>(&self, active_model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        active_model.insert(&self.db).await
    }

    /// Update an existing row and return the stored model.
    pub async fn update<A>(&self, active_model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        active_model.update(&self.db).await
    }

    /// Find a row by primary key.
    pub async fn find_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// Fetch all rows for the entity.
    pub async fn find_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(&self.db).await
    }

    /// Delete a row by primary key, returning the number of rows affected.
    pub async fn delete_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
