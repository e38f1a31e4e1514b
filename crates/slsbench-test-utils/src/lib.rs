//! Testing utilities for the slsbench workspace
//!
//! Shared fixture documents and graph builders.

#![allow(missing_docs)]

use slsbench_scenario::{ScenarioGraph, Vertex, VertexId};
use slsbench_spec::{Document, Method};

/// `GET /api/users` returning `{id, name, email}`
pub const SIMPLE_USERS: &str = r##"
openapi: 3.0.3
info: {title: users, version: "1.0"}
paths:
  /api/users:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                required: [id]
                properties:
                  id: {type: integer, format: int64}
                  name: {type: string, minLength: 1, maxLength: 64}
                  email: {type: string, format: email}
"##;

/// `200` response is an array of `{id, name, tags: [{name}]}`
pub const ARRAY_RESPONSE: &str = r##"
openapi: 3.0.3
info: {title: arrays, version: "1.0"}
paths:
  /api/items:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  type: object
                  properties:
                    id: {type: integer}
                    name: {type: string}
                    tags:
                      type: array
                      items:
                        type: object
                        properties:
                          name: {type: string}
"##;

/// allOf / anyOf / oneOf / not / additionalProperties
pub const COMPOSITION: &str = r##"
openapi: 3.0.3
info: {title: composition, version: "1.0"}
paths:
  /shapes:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              allOf:
                - $ref: "#/components/schemas/Named"
                - type: object
                  properties:
                    sides: {type: integer, minimum: 3, maximum: 12}
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  colour:
                    anyOf:
                      - type: object
                        properties:
                          rgb: {type: string, pattern: "^#[0-9a-f]{6}$"}
                  outline:
                    oneOf:
                      - type: object
                        properties:
                          width: {type: number}
                  forbidden:
                    not:
                      type: object
                      properties:
                        secret: {type: string}
                  labels:
                    type: object
                    additionalProperties: {type: string}
components:
  schemas:
    Named:
      type: object
      required: [name]
      properties:
        name: {type: string}
"##;

/// Self reference (`Node`) and mutual reference (`Author` ↔ `Book`)
pub const RECURSIVE: &str = r##"
openapi: 3.0.3
info: {title: recursive, version: "1.0"}
paths:
  /tree:
    get:
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: {$ref: "#/components/schemas/Node"}
  /authors:
    post:
      requestBody:
        content:
          application/json:
            schema: {$ref: "#/components/schemas/Author"}
      responses:
        "201":
          description: created
components:
  schemas:
    Node:
      type: object
      properties:
        value: {type: string}
        children:
          type: array
          items: {$ref: "#/components/schemas/Node"}
    Author:
      type: object
      properties:
        name: {type: string}
        books:
          type: array
          items: {$ref: "#/components/schemas/Book"}
    Book:
      type: object
      properties:
        title: {type: string}
        author: {$ref: "#/components/schemas/Author"}
"##;

/// Path-level and operation-level parameters in every location
pub const PARAMETERS: &str = r##"
openapi: 3.0.3
info: {title: params, version: "1.0"}
paths:
  /tenants/{tenant}/orders:
    parameters:
      - name: tenant
        in: path
        required: true
        schema: {type: string}
    get:
      parameters:
        - name: limit
          in: query
          schema: {type: integer, minimum: 1, maximum: 100}
        - name: X-Trace
          in: header
          schema: {type: string}
        - name: session
          in: cookie
          schema: {type: string}
      responses:
        "200":
          description: ok
    post:
      parameters:
        - name: tenant
          in: path
          required: true
          schema: {type: string, format: uuid}
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                sku: {type: string}
      responses:
        "201":
          description: created
"##;

/// A small CRUD API used by scenario tests
pub const MOVIES: &str = r##"
openapi: 3.0.3
info: {title: movies, version: "1.0"}
paths:
  /movies:
    get:
      parameters:
        - name: genre
          in: query
          schema: {type: string}
      responses:
        "200":
          description: list
          content:
            application/json:
              schema:
                type: array
                items: {$ref: "#/components/schemas/Movie"}
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema: {$ref: "#/components/schemas/Movie"}
      responses:
        "201":
          description: created
          content:
            application/json:
              schema: {$ref: "#/components/schemas/Movie"}
        "400":
          description: invalid
  /movies/{id}:
    parameters:
      - name: id
        in: path
        required: true
        schema: {type: integer}
    get:
      responses:
        "200":
          description: found
          content:
            application/json:
              schema: {$ref: "#/components/schemas/Movie"}
    delete:
      responses:
        "204":
          description: deleted
  /reviews:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required: [movie_id, rating]
              properties:
                movie_id: {type: integer}
                rating: {type: number, minimum: 0, maximum: 5}
                reviewer:
                  type: object
                  properties:
                    name: {type: string}
                    email: {type: string}
      responses:
        "201":
          description: created
components:
  schemas:
    Movie:
      type: object
      required: [title]
      properties:
        id: {type: integer, x-slsbench-unique: true}
        title: {type: string, x-user-hint: word}
        avg_rating: {type: number}
        genres:
          type: array
          items: {type: string}
"##;

/// Parse a fixture, panicking on malformed YAML
#[must_use]
pub fn load_fixture(yaml: &str) -> Document {
    Document::from_yaml_str(yaml).expect("fixture should parse")
}

/// Vertex for `method path` answering with `code`
#[must_use]
pub fn vertex(method: Method, path: &str, code: &str) -> Vertex {
    Vertex::new(path, method, code)
}

/// Graph with `n` placeholder vertices and the given edges
#[must_use]
pub fn graph_with_edges(n: usize, edges: &[(usize, usize)]) -> ScenarioGraph {
    let mut graph = ScenarioGraph::new();
    for i in 0..n {
        graph.add_vertex(vertex(Method::Get, &format!("/v{i}"), "200"));
    }
    for &(from, to) in edges {
        graph
            .add_edge(VertexId(from), VertexId(to))
            .expect("edge endpoints should exist");
    }
    graph
}
